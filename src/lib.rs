//! # Lexis - client SDK for the Lexis legal-document API
//!
//! An authenticated HTTP client for the Lexis backend: document upload and
//! risk analysis, reports, collaboration, lawyer/client sharing,
//! notifications and subscriptions.
//!
//! The client keeps users signed in without their involvement. Every request
//! carries the stored access token; when the backend answers 401, the client
//! exchanges the refresh token for a new access token and replays the
//! request. Concurrent requests that hit 401 together share a single refresh.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lexis::{Credentials, Lexis, LexisConfig};
//!
//! #[tokio::main]
//! async fn main() -> lexis::Result<()> {
//!     let config = LexisConfig::load_with_env("lexis.toml")?;
//!     let lexis = Lexis::from_config(&config)?;
//!
//!     lexis
//!         .auth()
//!         .login(&Credentials {
//!             email: "ana@example.com".to_string(),
//!             password: "secret".to_string(),
//!         })
//!         .await?;
//!
//!     for document in lexis.documents().list().await? {
//!         println!("{} [{}]", document.title, document.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`http`] - transport, refresh coordination and the authenticated client
//! - [`api`] - typed resource APIs built on the client
//! - [`session`] - credential storage and session helpers
//! - [`types`] - wire types and the crate error
//! - [`utils`] - configuration and display helpers
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `mock-server` | Bundles the in-memory backend behind `lexis mock-server` (default) |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Typed resource APIs.
pub mod api;
/// Request descriptors, transport, refresh coordinator and client.
pub mod http;
/// Credential storage and session helpers.
pub mod session;
/// Wire types and error handling.
pub mod types;
/// Configuration and formatting utilities.
pub mod utils;

pub use api::{
    ActivityApi, AuthApi, CollaborationApi, DashboardsApi, DocumentsApi, LawyersApi,
    NotificationsApi, SharingApi, SubscriptionsApi,
};
pub use http::{ApiClient, ApiRequest, ApiResponse, RefreshCoordinator, Transport};
pub use session::{CredentialStore, FileStore, MemoryStore, Session};
pub use types::*;
pub use utils::toml_config::{ConfigError, LexisConfig};

use std::sync::Arc;

/// Entry point bundling one [`ApiClient`] with every resource API.
///
/// All accessors share the same client, session and refresh coordinator.
#[derive(Debug, Clone)]
pub struct Lexis {
    client: Arc<ApiClient>,
}

impl Lexis {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn from_config(config: &LexisConfig) -> Result<Self> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(Arc::clone(&self.client))
    }

    pub fn documents(&self) -> DocumentsApi {
        DocumentsApi::new(Arc::clone(&self.client))
    }

    pub fn collaboration(&self) -> CollaborationApi {
        CollaborationApi::new(Arc::clone(&self.client))
    }

    pub fn sharing(&self) -> SharingApi {
        SharingApi::new(Arc::clone(&self.client))
    }

    pub fn lawyers(&self) -> LawyersApi {
        LawyersApi::new(Arc::clone(&self.client))
    }

    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(Arc::clone(&self.client))
    }

    pub fn activity(&self) -> ActivityApi {
        ActivityApi::new(Arc::clone(&self.client))
    }

    pub fn subscriptions(&self) -> SubscriptionsApi {
        SubscriptionsApi::new(Arc::clone(&self.client))
    }

    pub fn dashboards(&self) -> DashboardsApi {
        DashboardsApi::new(Arc::clone(&self.client))
    }
}
