use crate::{
    auth::AuthUser,
    error::Result,
    models::{ActivityLog, LogQuery, Message, Notification},
    store::MockStore,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

pub async fn list(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Json<Vec<Notification>> {
    Json(store.notifications(&user))
}

pub async fn mark_read(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>> {
    store.mark_notification_read(&user, id).map(Json)
}

pub async fn mark_all_read(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Json<Message> {
    Json(store.mark_all_read(&user))
}

pub async fn delete(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    store.delete_notification(&user, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activity log, optionally filtered with `?type=`
pub async fn logs(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Query(query): Query<LogQuery>,
) -> Json<Vec<ActivityLog>> {
    Json(store.activity(&user, query.kind.as_deref()))
}
