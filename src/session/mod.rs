//! Session credentials
//!
//! The access token, refresh token and cached user profile live in a
//! [`CredentialStore`]. [`Session`] is the typed view over that store used by
//! the HTTP client and the view layer.

/// Storage backends for credentials.
pub mod store;

pub use store::{CredentialStore, FileStore, MemoryStore};

use crate::types::{AuthTokens, Result, Role, User};
use std::sync::Arc;
use tracing::warn;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

/// Cloneable handle over the credential store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Session backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_access_token(&self, token: &str) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<()> {
        self.store.set(REFRESH_TOKEN_KEY, token)
    }

    /// Persist everything a successful login or signup returns.
    pub fn save_login(&self, tokens: &AuthTokens) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh)?;
        self.save_user(&tokens.user)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &raw)
    }

    /// Remove both tokens and the cached profile.
    ///
    /// Every key is attempted even if an earlier removal fails; the first
    /// failure is returned.
    pub fn clear(&self) -> Result<()> {
        let mut first_error = None;
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, error = %e, "Failed to remove credential");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Cached profile; `None` when absent or unparsable.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    /// Premium check against the cached profile, without a network call.
    pub fn is_premium_cached(&self) -> bool {
        self.current_user()
            .map(|u| u.subscription_plan.as_deref() == Some("premium") || u.is_premium)
            .unwrap_or(false)
    }

    /// True when a premium-gated feature should prompt for an upgrade.
    pub fn requires_premium(&self) -> bool {
        !self.is_premium_cached()
    }

    /// Dashboard for an explicit role, or for the cached user's role.
    pub fn dashboard_route(&self, role: Option<Role>) -> &'static str {
        role.or_else(|| self.role())
            .unwrap_or_default()
            .dashboard_route()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, plan: Option<&str>, premium: bool) -> User {
        User {
            id: 1,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
            subscription_plan: plan.map(str::to_string),
            is_premium: premium,
        }
    }

    #[test]
    fn test_save_login_and_clear() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session
            .save_login(&AuthTokens {
                access: "a".to_string(),
                refresh: "r".to_string(),
                user: user(Role::Lawyer, None, false),
            })
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.access_token().as_deref(), Some("a"));
        assert_eq!(session.refresh_token().as_deref(), Some("r"));
        assert_eq!(session.role(), Some(Role::Lawyer));

        session.clear().unwrap();
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let session = Session::in_memory();
        session.set_access_token("").unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_unparsable_user_is_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "{not json").unwrap();
        let session = Session::new(store);
        assert!(session.current_user().is_none());
        assert_eq!(session.dashboard_route(None), "/individual-dashboard");
    }

    #[test]
    fn test_premium_from_cached_profile() {
        let session = Session::in_memory();
        assert!(session.requires_premium());

        session.save_user(&user(Role::Individual, Some("premium"), false)).unwrap();
        assert!(session.is_premium_cached());

        session.save_user(&user(Role::Individual, Some("free"), true)).unwrap();
        assert!(session.is_premium_cached());

        session.save_user(&user(Role::Individual, Some("free"), false)).unwrap();
        assert!(session.requires_premium());
    }

    #[test]
    fn test_dashboard_route_prefers_explicit_role() {
        let session = Session::in_memory();
        session.save_user(&user(Role::Lawyer, None, false)).unwrap();
        assert_eq!(session.dashboard_route(None), "/lawyer-dashboard");
        assert_eq!(session.dashboard_route(Some(Role::Admin)), "/admin-dashboard");
    }
}
