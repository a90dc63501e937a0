//! # lexis-mock
//!
//! An in-memory stand-in for the Lexis backend. It serves the same JSON
//! shapes and paths under `/api/`, issues short-lived access tokens and
//! answers 401 with `Given token not valid for any token type` once they
//! expire, which makes it suitable for exercising token refresh end to end.
//!
//! ```rust,ignore
//! let server = lexis_mock::spawn_local_server().await?;
//! println!("{}", server.base_url()); // http://127.0.0.1:PORT/api/
//! server.store().expire_access_tokens();
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;

pub use error::{MockError, INVALID_TOKEN_DETAIL};
pub use routes::router;
pub use store::{MockStore, SeededAccount, FREE_ANALYSIS_LIMIT, SEEDED_ACCOUNTS};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Server behaviour knobs.
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Lifetime of issued access tokens.
    pub access_ttl: Duration,
    /// Artificial latency on the refresh endpoint.
    pub refresh_delay: Duration,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            access_ttl: Duration::from_secs(300),
            refresh_delay: Duration::ZERO,
        }
    }
}

/// Bind `addr` and serve until the process stops.
pub async fn serve(addr: SocketAddr, options: MockOptions) -> std::io::Result<()> {
    let store = Arc::new(store_for(&options));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Mock backend listening on {}", listener.local_addr()?);
    axum::serve(listener, router(store)).await
}

fn store_for(options: &MockOptions) -> MockStore {
    MockStore::new(options.access_ttl).with_refresh_delay(options.refresh_delay)
}

/// A server running on a background task. Dropping the handle stops it.
#[derive(Debug)]
pub struct MockServerHandle {
    addr: SocketAddr,
    store: Arc<MockStore>,
    task: JoinHandle<()>,
}

impl MockServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL with the `/api/` prefix and trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    /// Direct access to server state, for expiring tokens or counting refreshes.
    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }
}

impl Drop for MockServerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start a server with default options on an ephemeral localhost port.
pub async fn spawn_local_server() -> std::io::Result<MockServerHandle> {
    spawn_with(MockOptions::default()).await
}

pub async fn spawn_with(options: MockOptions) -> std::io::Result<MockServerHandle> {
    let store = Arc::new(store_for(&options));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let app = router(store.clone());
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mock backend stopped: {}", e);
        }
    });

    Ok(MockServerHandle { addr, store, task })
}
