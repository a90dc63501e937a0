use crate::http::{ApiClient, ApiRequest};
use crate::types::{Result, SharedDocument};
use serde_json::json;
use std::sync::Arc;

/// Lawyer to client document sharing.
#[derive(Debug, Clone)]
pub struct SharingApi {
    client: Arc<ApiClient>,
}

impl SharingApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn share(&self, document_id: i64, client_id: i64) -> Result<SharedDocument> {
        let request = ApiRequest::post("documents/share/")
            .json(&json!({ "document_id": document_id, "client_id": client_id }))?;
        self.client.json(request).await
    }

    pub async fn accept(&self, share_id: i64) -> Result<SharedDocument> {
        self.client
            .json(ApiRequest::post(format!("documents/share/{}/accept/", share_id)))
            .await
    }

    pub async fn decline(&self, share_id: i64) -> Result<SharedDocument> {
        self.client
            .json(ApiRequest::post(format!("documents/share/{}/decline/", share_id)))
            .await
    }

    pub async fn shared_by_me(&self) -> Result<Vec<SharedDocument>> {
        self.client
            .json(ApiRequest::get("documents/shared/by-me/"))
            .await
    }

    pub async fn shared_with_me(&self) -> Result<Vec<SharedDocument>> {
        self.client
            .json(ApiRequest::get("documents/shared/with-me/"))
            .await
    }
}
