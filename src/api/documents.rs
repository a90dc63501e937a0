use crate::http::{ApiClient, ApiRequest, FormPart};
use crate::types::{AnalysisResult, Document, Report, Result, UploadFile};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DocumentsApi {
    client: Arc<ApiClient>,
}

impl DocumentsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Documents owned by the current user.
    pub async fn list(&self) -> Result<Vec<Document>> {
        self.client.json(ApiRequest::get("documents/")).await
    }

    pub async fn get(&self, id: i64) -> Result<Document> {
        self.client
            .json(ApiRequest::get(format!("documents/{}/", id)))
            .await
    }

    /// Upload a file as multipart field `file`, with an optional `title`.
    pub async fn upload(&self, file: UploadFile) -> Result<Document> {
        let mut parts = vec![FormPart::File {
            name: "file".to_string(),
            file_name: file.file_name,
            mime: file.mime,
            bytes: file.bytes,
        }];
        if let Some(title) = file.title.filter(|t| !t.trim().is_empty()) {
            parts.push(FormPart::Text {
                name: "title".to_string(),
                value: title,
            });
        }
        self.client
            .json(ApiRequest::post("documents/upload/").multipart(parts))
            .await
    }

    pub async fn analyze(&self, id: i64) -> Result<AnalysisResult> {
        self.client
            .json(ApiRequest::post(format!("documents/{}/analyze/", id)))
            .await
    }

    pub async fn report(&self, id: i64) -> Result<Report> {
        self.client
            .json(ApiRequest::get(format!("documents/{}/report/", id)))
            .await
    }

    /// Raw bytes of the stored file.
    pub async fn download(&self, id: i64) -> Result<Vec<u8>> {
        let response = self
            .client
            .send(ApiRequest::get(format!("documents/{}/download/", id)))
            .await?;
        Ok(response.into_bytes())
    }
}
