//! Account endpoints
//!
//! `login` and `register` persist the returned token pair and profile into the
//! client's session, so later calls are authenticated without further setup.

use crate::http::{ApiClient, ApiRequest, REFRESH_PATH};
use crate::types::{AuthTokens, Credentials, RefreshedAccess, RegisterRequest, Result, User};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthTokens> {
        let tokens: AuthTokens = self
            .client
            .json(ApiRequest::post("auth/register/").json(request)?)
            .await?;
        self.client.session().save_login(&tokens)?;
        info!(user_id = tokens.user.id, role = %tokens.user.role, "Registered new account");
        Ok(tokens)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthTokens> {
        let tokens: AuthTokens = self
            .client
            .json(ApiRequest::post("auth/login/").json(credentials)?)
            .await?;
        self.client.session().save_login(&tokens)?;
        info!(user_id = tokens.user.id, role = %tokens.user.role, "Logged in");
        Ok(tokens)
    }

    pub async fn profile(&self) -> Result<User> {
        self.client.json(ApiRequest::get("auth/profile/")).await
    }

    /// Fetch the profile and replace the cached copy.
    pub async fn refresh_profile(&self) -> Result<User> {
        let user = self.profile().await?;
        self.client.session().save_user(&user)?;
        Ok(user)
    }

    /// Explicit token refresh.
    ///
    /// Goes through the intercepted client, so a 401 here clears the session
    /// instead of starting another refresh. The new access token is stored.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedAccess> {
        let refreshed: RefreshedAccess = self
            .client
            .json(ApiRequest::post(REFRESH_PATH).json(&json!({ "refresh": refresh_token }))?)
            .await?;
        self.client.session().set_access_token(&refreshed.access)?;
        if let Some(rotated) = refreshed.refresh.as_deref() {
            self.client.session().set_refresh_token(rotated)?;
        }
        Ok(refreshed)
    }

    /// Client-side logout. The backend keeps no session to end.
    pub fn logout(&self) -> Result<()> {
        let outcome = self.client.clear_credentials();
        match &outcome {
            Ok(()) => info!("Logged out"),
            Err(e) => warn!(error = %e, "Logout could not clear every credential"),
        }
        outcome
    }
}
