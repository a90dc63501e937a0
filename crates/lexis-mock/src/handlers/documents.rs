use crate::{
    auth::AuthUser,
    error::{MockError, Result},
    models::{Analysis, Document, Report},
    store::MockStore,
};
use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn list(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
) -> Json<Vec<Document>> {
    Json(store.documents(&user))
}

pub async fn get(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Document>> {
    store.document(&user, id).map(Json)
}

/// Multipart upload with a required `file` part and an optional `title` part
pub async fn upload(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Document>> {
    let mut file = None;
    let mut title = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MockError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| MockError::BadRequest(e.to_string()))?;
                file = Some((file_name, mime, bytes.to_vec()));
            }
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| MockError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let (file_name, mime, bytes) =
        file.ok_or_else(|| MockError::BadRequest("No file was submitted.".to_string()))?;
    store.upload(&user, file_name, mime, bytes, title).map(Json)
}

pub async fn analyze(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Analysis>> {
    store.analyze(&user, id).map(Json)
}

pub async fn report(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Report>> {
    store.report(&user, id).map(Json)
}

pub async fn download(
    State(store): State<Arc<MockStore>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let (bytes, mime, file_name) = store.download(&user, id)?;
    let headers = [
        (
            header::CONTENT_TYPE,
            mime.unwrap_or_else(|| "application/octet-stream".to_string()),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];
    Ok((headers, bytes))
}
