//! Raw HTTP transport
//!
//! Sends [`ApiRequest`]s with reqwest and buffers the response. The transport
//! knows nothing about credentials; it sends exactly the headers it is given
//! and never interprets status codes, except for the dedicated refresh call.

use crate::http::request::{ApiRequest, ApiResponse, FormPart, RequestBody, REFRESH_PATH};
use crate::types::{error_message, ClientError, RefreshedAccess, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl Transport {
    /// Build a transport for `base_url` with one fixed timeout for every request.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let base = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve an API path against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidInput(format!("Invalid path '{}': {}", path, e)))
    }

    /// Send a request with exactly `headers` and buffer whatever comes back.
    pub async fn dispatch(&self, request: &ApiRequest, headers: HeaderMap) -> Result<ApiResponse> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, %url, "Dispatching request");

        let mut builder = self.http.request(request.method.clone(), url).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(%status, bytes = body.len(), "Response received");

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// This call bypasses credential attachment and 401 interception. Any
    /// failure, including a non-2xx answer, is a [`ClientError::RefreshFailed`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedAccess> {
        let url = self.url_for(REFRESH_PATH)?;
        debug!(%url, "Requesting new access token");

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await
            .map_err(|e| ClientError::RefreshFailed {
                status: None,
                message: ClientError::from(e).to_string(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ClientError::RefreshFailed {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ClientError::RefreshFailed {
                status: Some(status.as_u16()),
                message: error_message(status.as_u16(), &body),
            });
        }

        serde_json::from_slice::<RefreshedAccess>(&body).map_err(|e| ClientError::RefreshFailed {
            status: Some(status.as_u16()),
            message: format!("Malformed refresh response: {}", e),
        })
    }
}

/// Parse the API base, forcing a trailing slash so relative joins keep the prefix.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    let url = Url::parse(&normalized)
        .map_err(|e| ClientError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::Config(format!(
            "Unsupported URL scheme '{}' in API base URL",
            other
        ))),
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file.mime_str(mime).map_err(|e| {
                        ClientError::InvalidInput(format!("Invalid MIME type '{}': {}", mime, e))
                    })?;
                }
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> Transport {
        Transport::new(base, Duration::from_secs(10), "lexis-test").unwrap()
    }

    #[test]
    fn test_url_for_keeps_api_prefix() {
        let t = transport("http://127.0.0.1:8000/api");
        assert_eq!(
            t.url_for("documents/12/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/documents/12/"
        );
        assert_eq!(
            t.url_for("/auth/token/refresh/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/auth/token/refresh/"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_optional() {
        let a = transport("http://localhost:8000/api/");
        let b = transport("http://localhost:8000/api");
        assert_eq!(a.base_url(), b.base_url());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            Transport::new("ftp://example.com", Duration::from_secs(1), "x"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            Transport::new("not a url", Duration::from_secs(1), "x"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_build_form_rejects_bad_mime() {
        let parts = vec![FormPart::File {
            name: "file".to_string(),
            file_name: "a.pdf".to_string(),
            mime: Some("not a mime".to_string()),
            bytes: vec![1, 2, 3],
        }];
        assert!(matches!(build_form(&parts), Err(ClientError::InvalidInput(_))));
    }
}
