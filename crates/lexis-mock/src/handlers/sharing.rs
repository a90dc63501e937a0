use crate::{
    auth::AuthUser,
    error::Result,
    models::{ShareBody, SharedDocument},
    store::MockStore,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

pub async fn share(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ShareBody>,
) -> Result<(StatusCode, Json<SharedDocument>)> {
    let shared = store.share(&user, &payload)?;
    Ok((StatusCode::CREATED, Json(shared)))
}

pub async fn accept(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(share_id): Path<i64>,
) -> Result<Json<SharedDocument>> {
    store.respond_share(&user, share_id, true).map(Json)
}

pub async fn decline(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(share_id): Path<i64>,
) -> Result<Json<SharedDocument>> {
    store.respond_share(&user, share_id, false).map(Json)
}

pub async fn shared_by_me(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Json<Vec<SharedDocument>> {
    Json(store.shared_by(&user))
}

pub async fn shared_with_me(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Json<Vec<SharedDocument>> {
    Json(store.shared_with(&user))
}
