//! HTTP plumbing: request descriptors, the raw transport, the refresh
//! coordinator and the authenticated client built on top of them.

pub mod client;
pub mod coordinator;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use coordinator::RefreshCoordinator;
pub use request::{ApiRequest, ApiResponse, FormPart, RequestBody, REFRESH_PATH};
pub use transport::Transport;
