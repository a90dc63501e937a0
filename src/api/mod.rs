//! Typed resource APIs
//!
//! Each resource is a thin wrapper over a shared [`ApiClient`], so every call
//! gets token attachment and transparent refresh for free. Paths are relative
//! to the configured API base.
//!
//! # Resources
//!
//! - [`auth`] - register, login, profile, token refresh, logout
//! - [`documents`] - upload, list, analyze, report, download
//! - [`collaboration`] - comments and versions on a document
//! - [`sharing`] - lawyer to client document sharing
//! - [`lawyers`] - lawyer/client assignments and search
//! - [`notifications`] - in-app notifications
//! - [`activity`] - activity log with client-side classification
//! - [`subscriptions`] - plan status, checkout and billing portal
//! - [`dashboards`] - admin and lawyer analytics
//!
//! [`ApiClient`]: crate::http::ApiClient

pub mod activity;
pub mod auth;
pub mod collaboration;
pub mod dashboards;
pub mod documents;
pub mod lawyers;
pub mod notifications;
pub mod sharing;
pub mod subscriptions;

pub use activity::ActivityApi;
pub use auth::AuthApi;
pub use collaboration::CollaborationApi;
pub use dashboards::DashboardsApi;
pub use documents::DocumentsApi;
pub use lawyers::LawyersApi;
pub use notifications::NotificationsApi;
pub use sharing::SharingApi;
pub use subscriptions::SubscriptionsApi;
