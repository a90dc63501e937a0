use crate::{
    auth::AuthUser,
    error::Result,
    models::{AccessToken, LoginBody, RefreshBody, RegisterBody, TokenPair, User},
    store::MockStore,
};
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn register(
    State(store): State<Arc<MockStore>>,
    Json(payload): Json<RegisterBody>,
) -> Result<Json<TokenPair>> {
    store.register(&payload).map(Json)
}

pub async fn login(
    State(store): State<Arc<MockStore>>,
    Json(payload): Json<LoginBody>,
) -> Result<Json<TokenPair>> {
    store.login(&payload).map(Json)
}

/// Exchange a refresh token for a new access token
pub async fn refresh_token(
    State(store): State<Arc<MockStore>>,
    Json(payload): Json<RefreshBody>,
) -> Result<Json<AccessToken>> {
    let delay = store.refresh_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    store.refresh(&payload.refresh).map(Json)
}

pub async fn profile(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<User>> {
    store.profile(&user).map(Json)
}
