use crate::{auth::AuthUser, error::Result, store::MockStore};
use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

pub async fn admin(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>> {
    store.admin_analytics(&user).map(Json)
}

pub async fn lawyer(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>> {
    store.lawyer_analytics(&user).map(Json)
}
