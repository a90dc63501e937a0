use crate::{
    auth::AuthUser,
    error::Result,
    models::{AssignBody, Assignment, ClientSummary, Lawyer, Message, Party, RespondBody, SearchQuery},
    store::MockStore,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

pub async fn assign_client(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<AssignBody>,
) -> Result<(StatusCode, Json<Assignment>)> {
    let assignment = store.assign_client(&user, &payload.client_email)?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn respond(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<RespondBody>,
) -> Result<Json<Message>> {
    store.respond_assignment(&user, &payload).map(Json)
}

pub async fn lawyer_clients(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ClientSummary>>> {
    store.lawyer_clients(&user).map(Json)
}

pub async fn client_lawyer(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Lawyer>> {
    store.client_lawyer(&user).map(Json)
}

pub async fn client_requests(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Assignment>>> {
    store.client_requests(&user).map(Json)
}

pub async fn lawyer_requests(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Assignment>>> {
    store.lawyer_requests(&user).map(Json)
}

pub async fn search(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Party>>> {
    store.search_users(&user, &query.q).map(Json)
}
