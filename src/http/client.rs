//! Authenticated API client
//!
//! [`ApiClient`] attaches the stored access token to every request and
//! recovers from an expired one:
//!
//! - A 401 on a request that has not been retried yet triggers a token
//!   refresh through the [`RefreshCoordinator`], then one replay of the
//!   request with the new token.
//! - A 401 from the refresh endpoint itself, or a 401 with no refresh token
//!   stored, wipes the credentials and surfaces the original error.
//! - A failed refresh wipes the credentials and fails every waiting request
//!   with the refresh error.
//!
//! Any other non-2xx status is returned untouched as [`ClientError::Http`].

use crate::http::coordinator::RefreshCoordinator;
use crate::http::request::{ApiRequest, ApiResponse};
use crate::http::transport::Transport;
use crate::session::Session;
use crate::types::{ClientError, Result};
use crate::utils::toml_config::LexisConfig;
use arc_swap::ArcSwap;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ApiClient {
    transport: Transport,
    session: Session,
    coordinator: RefreshCoordinator,
    default_headers: Arc<ArcSwap<HeaderMap>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.transport.base_url().as_str())
            .field("session", &self.session)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl ApiClient {
    pub fn new(transport: Transport, session: Session) -> Self {
        Self {
            transport,
            session,
            coordinator: RefreshCoordinator::new(),
            default_headers: Arc::new(ArcSwap::from_pointee(HeaderMap::new())),
        }
    }

    /// Build a client from the `[api]` and `[storage]` sections of the config.
    pub fn from_config(config: &LexisConfig) -> Result<Self> {
        let transport = Transport::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
            &config.api.user_agent,
        )?;
        let session = config.storage.open_session()?;
        Ok(Self::new(transport, session))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Snapshot of the headers sent with every request.
    pub fn default_headers(&self) -> HeaderMap {
        HeaderMap::clone(&self.default_headers.load())
    }

    /// Send a request, refreshing the access token once if it was rejected.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let response = self
            .dispatch(&request, self.session.access_token().as_deref())
            .await?;

        if response.is_success() {
            return Ok(response);
        }
        if response.status() != StatusCode::UNAUTHORIZED || request.is_retried() {
            return response.error_for_status();
        }

        request.mark_retried();
        let original = ClientError::from_body(response.status().as_u16(), response.bytes());

        if request.is_refresh_request() {
            warn!("Refresh endpoint rejected the session, clearing credentials");
            self.wipe_credentials();
            return Err(original);
        }

        let refresh_token = match self.session.refresh_token() {
            Some(token) => token,
            None => {
                warn!(path = %request.path, "Access token rejected and no refresh token stored");
                self.wipe_credentials();
                return Err(original);
            }
        };

        let token = self
            .coordinator
            .await_refreshed_token(|| self.refresh_session(refresh_token))
            .await?;

        debug!(method = %request.method, path = %request.path, "Replaying request with refreshed token");
        self.dispatch(&request, Some(&token))
            .await?
            .error_for_status()
    }

    /// Send a request and decode its JSON body.
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }

    /// Forget every stored credential. Used by logout.
    pub fn clear_credentials(&self) -> Result<()> {
        let outcome = self.session.clear();
        set_default_authorization(&self.default_headers, None);
        outcome
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse> {
        let mut headers = self.default_headers();
        if let Some(token) = token {
            headers.insert(AUTHORIZATION, bearer(token)?);
        }
        self.transport.dispatch(request, headers).await
    }

    fn wipe_credentials(&self) {
        if let Err(e) = self.clear_credentials() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
    }

    /// The refresh itself plus its side effects, owned so the coordinator can
    /// share it between waiters.
    fn refresh_session(
        &self,
        refresh_token: String,
    ) -> impl Future<Output = Result<String>> + Send + 'static {
        let transport = self.transport.clone();
        let session = self.session.clone();
        let default_headers = Arc::clone(&self.default_headers);

        async move {
            match transport.refresh(&refresh_token).await {
                Ok(refreshed) => {
                    if let Err(e) = session.set_access_token(&refreshed.access) {
                        warn!(error = %e, "Failed to persist refreshed access token");
                    }
                    if let Some(rotated) = refreshed.refresh.as_deref() {
                        if let Err(e) = session.set_refresh_token(rotated) {
                            warn!(error = %e, "Failed to persist rotated refresh token");
                        }
                    }
                    set_default_authorization(&default_headers, Some(&refreshed.access));
                    info!("Access token refreshed");
                    Ok(refreshed.access)
                }
                Err(e) => {
                    warn!(error = %e, "Token refresh failed, clearing credentials");
                    if let Err(clear_err) = session.clear() {
                        warn!(error = %clear_err, "Failed to clear stored credentials");
                    }
                    set_default_authorization(&default_headers, None);
                    Err(e)
                }
            }
        }
    }
}

fn bearer(token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        ClientError::InvalidInput("Access token contains invalid header characters".to_string())
    })
}

fn set_default_authorization(headers: &ArcSwap<HeaderMap>, token: Option<&str>) {
    let value = token.and_then(|t| bearer(t).ok());
    headers.rcu(|current| {
        let mut next = HeaderMap::clone(current);
        match &value {
            Some(value) => {
                next.insert(AUTHORIZATION, value.clone());
            }
            None => {
                next.remove(AUTHORIZATION);
            }
        }
        next
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let transport =
            Transport::new("http://127.0.0.1:9/api/", Duration::from_secs(1), "lexis-test").unwrap();
        ApiClient::new(transport, Session::in_memory())
    }

    #[test]
    fn test_default_authorization_set_and_removed() {
        let client = client();
        assert!(client.default_headers().get(AUTHORIZATION).is_none());

        set_default_authorization(&client.default_headers, Some("t2"));
        assert_eq!(
            client.default_headers().get(AUTHORIZATION).unwrap(),
            "Bearer t2"
        );

        client.clear_credentials().unwrap();
        assert!(client.default_headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_bearer_rejects_control_characters() {
        assert!(bearer("abc").is_ok());
        assert!(matches!(bearer("a\nb"), Err(ClientError::InvalidInput(_))));
    }

    #[test]
    fn test_clear_credentials_wipes_session() {
        let client = client();
        client.session().set_access_token("a").unwrap();
        client.session().set_refresh_token("r").unwrap();

        client.clear_credentials().unwrap();
        assert!(client.session().access_token().is_none());
        assert!(client.session().refresh_token().is_none());
    }
}
