//! Single-flight access token refresh
//!
//! When several requests are rejected with 401 at about the same time, only
//! one of them may talk to the refresh endpoint. [`RefreshCoordinator`] keeps
//! the in-flight refresh as a shared future:
//!
//! 1. The first caller finds the slot empty, creates the refresh future,
//!    stores a handle to it and awaits it.
//! 2. Later callers find the slot occupied and await a clone of the same
//!    future, so they observe the same token or the same error.
//! 3. The future empties the slot itself just before it resolves, so the
//!    coordinator is idle again by the time any caller sees the outcome.
//!
//! The check-and-set on the slot happens under a mutex, so two refreshes can
//! never start concurrently even on a multi-threaded runtime. Any clone of the
//! shared future can drive it to completion, so dropping the caller that
//! started the refresh does not strand the others.
//!
//! # Example
//!
//! ```rust,ignore
//! use lexis::http::RefreshCoordinator;
//!
//! let coordinator = RefreshCoordinator::new();
//! let token = coordinator
//!     .await_refreshed_token(|| async { Ok("new-access-token".to_string()) })
//!     .await?;
//! ```

use crate::types::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

type PendingRefresh = Shared<BoxFuture<'static, Result<String>>>;

/// Serializes concurrent refresh attempts into one network call.
#[derive(Default)]
pub struct RefreshCoordinator {
    in_flight: Arc<Mutex<Option<PendingRefresh>>>,
    attempts: AtomicU64,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .field("attempts", &self.attempts())
            .finish()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Number of refresh attempts started over the coordinator's lifetime.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Wait for a freshly minted access token.
    ///
    /// If no refresh is in flight, `start` is called to build one and the
    /// caller becomes its first waiter. Otherwise `start` is dropped unused
    /// and the caller joins the refresh already running. Every caller joined
    /// to the same refresh receives the same result exactly once.
    pub async fn await_refreshed_token<F, Fut>(&self, start: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let pending = {
            let mut slot = self.in_flight.lock();
            match slot.as_ref() {
                Some(pending) => {
                    debug!("Refresh already in flight, waiting for its result");
                    pending.clone()
                }
                None => {
                    let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(attempt, "Starting token refresh");

                    let slot_handle = Arc::clone(&self.in_flight);
                    let refresh = start();
                    let pending = async move {
                        let outcome = refresh.await;
                        slot_handle.lock().take();
                        outcome
                    }
                    .boxed()
                    .shared();

                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientError;
    use futures::future::join_all;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn test_single_caller_gets_token_and_coordinator_resets() {
        let coordinator = RefreshCoordinator::new();
        assert!(!coordinator.is_refreshing());

        let token = coordinator
            .await_refreshed_token(|| async { Ok("t2".to_string()) })
            .await
            .unwrap();

        assert_eq!(token, "t2");
        assert!(!coordinator.is_refreshing());
        assert_eq!(coordinator.attempts(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let waiters = (0..8).map(|_| {
            let calls = Arc::clone(&calls);
            coordinator.await_refreshed_token(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok("shared-token".to_string())
            })
        });

        let results = join_all(waiters).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.attempts(), 1);
        assert!(results
            .iter()
            .all(|r| r.as_deref() == Ok("shared-token")));
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_failure_reaches_every_waiter() {
        let coordinator = RefreshCoordinator::new();
        let failure = ClientError::RefreshFailed {
            status: Some(401),
            message: "Token is invalid or expired".to_string(),
        };

        let waiters = (0..3).map(|_| {
            let failure = failure.clone();
            coordinator.await_refreshed_token(move || async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Err(failure)
            })
        });

        let results = join_all(waiters).await;
        assert!(results.iter().all(|r| r.as_ref() == Err(&failure)));
        assert!(!coordinator.is_refreshing());
        assert_eq!(coordinator.attempts(), 1);
    }

    #[tokio::test]
    async fn test_new_refresh_starts_after_previous_settles() {
        let coordinator = RefreshCoordinator::new();

        let first = coordinator
            .await_refreshed_token(|| async { Ok("t2".to_string()) })
            .await
            .unwrap();
        let second = coordinator
            .await_refreshed_token(|| async { Ok("t3".to_string()) })
            .await
            .unwrap();

        assert_eq!(first, "t2");
        assert_eq!(second, "t3");
        assert_eq!(coordinator.attempts(), 2);
    }

    #[tokio::test]
    async fn test_flag_is_set_while_refresh_runs() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let runner = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .await_refreshed_token(move || async move {
                        let _ = release_rx.await;
                        Ok("t2".to_string())
                    })
                    .await
            })
        };

        // wait until the spawned task has claimed the slot
        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        // a late joiner must not run its own refresh
        let joiner = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .await_refreshed_token(|| async { Ok("never-used".to_string()) })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(coordinator.is_refreshing());
        release_tx.send(()).unwrap();

        assert_eq!(runner.await.unwrap().unwrap(), "t2");
        assert_eq!(joiner.await.unwrap().unwrap(), "t2");
        assert_eq!(coordinator.attempts(), 1);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn test_refresh_survives_dropped_starter() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let starter = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .await_refreshed_token(move || async move {
                        let _ = release_rx.await;
                        Ok("t2".to_string())
                    })
                    .await
            })
        };

        while !coordinator.is_refreshing() {
            tokio::task::yield_now().await;
        }

        let joiner = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .await_refreshed_token(|| async { Ok("never-used".to_string()) })
                    .await
            })
        };

        starter.abort();
        tokio::time::sleep(Duration::from_millis(20)).await;
        release_tx.send(()).unwrap();

        assert_eq!(joiner.await.unwrap().unwrap(), "t2");
        assert!(!coordinator.is_refreshing());
    }
}
