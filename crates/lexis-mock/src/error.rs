use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Detail returned for a missing, unknown or expired access token.
pub const INVALID_TOKEN_DETAIL: &str = "Given token not valid for any token type";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),
}

impl MockError {
    pub fn invalid_token() -> Self {
        MockError::Unauthorized(INVALID_TOKEN_DETAIL.to_string())
    }

    pub fn not_found(what: &str) -> Self {
        MockError::NotFound(format!("{} not found.", what))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            MockError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MockError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MockError::Forbidden(_) => StatusCode::FORBIDDEN,
            MockError::NotFound(_) => StatusCode::NOT_FOUND,
            MockError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "detail": self.to_string()
        });

        (self.status(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, MockError>;
