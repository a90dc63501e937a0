//! Comments and version history on a document.

use crate::http::{ApiClient, ApiRequest};
use crate::types::{Comment, Result, Version};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CollaborationApi {
    client: Arc<ApiClient>,
}

impl CollaborationApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn comments(&self, document_id: i64) -> Result<Vec<Comment>> {
        self.client
            .json(ApiRequest::get(format!("documents/{}/comments/", document_id)))
            .await
    }

    pub async fn add_comment(&self, document_id: i64, text: &str) -> Result<Comment> {
        let request = ApiRequest::post(format!("documents/{}/comments/", document_id))
            .json(&json!({ "text": text }))?;
        self.client.json(request).await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
        self.client
            .send(ApiRequest::delete(format!("documents/comments/{}/", comment_id)))
            .await?;
        Ok(())
    }

    pub async fn versions(&self, document_id: i64) -> Result<Vec<Version>> {
        self.client
            .json(ApiRequest::get(format!("documents/{}/versions/", document_id)))
            .await
    }

    pub async fn version(&self, version_id: i64) -> Result<Version> {
        self.client
            .json(ApiRequest::get(format!("documents/versions/{}/", version_id)))
            .await
    }
}
