use crate::error::MockError;
use crate::models::User;
use crate::store::MockStore;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Resolve the bearer token and stash the user in request extensions.
pub async fn auth_middleware(
    State(store): State<Arc<MockStore>>,
    mut req: Request,
    next: Next,
) -> Result<Response, MockError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(MockError::invalid_token)?;

    let user = store.authenticate(token.trim())?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// The authenticated caller of a protected route.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = MockError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(MockError::invalid_token)
    }
}
