use crate::{
    auth::AuthUser,
    error::Result,
    models::{Comment, CommentBody, Version},
    store::MockStore,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

pub async fn list_comments(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(document_id): Path<i64>,
) -> Result<Json<Vec<Comment>>> {
    store.comments(&user, document_id).map(Json)
}

pub async fn add_comment(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(document_id): Path<i64>,
    Json(payload): Json<CommentBody>,
) -> Result<(StatusCode, Json<Comment>)> {
    let comment = store.add_comment(&user, document_id, &payload.text)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode> {
    store.delete_comment(&user, comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_versions(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(document_id): Path<i64>,
) -> Result<Json<Vec<Version>>> {
    store.versions(&user, document_id).map(Json)
}

pub async fn get_version(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(version_id): Path<i64>,
) -> Result<Json<Version>> {
    store.version(&user, version_id).map(Json)
}
