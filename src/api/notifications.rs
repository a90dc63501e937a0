use crate::http::{ApiClient, ApiRequest};
use crate::types::{Acknowledgement, Notification, Result};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NotificationsApi {
    client: Arc<ApiClient>,
}

impl NotificationsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Notification>> {
        self.client.json(ApiRequest::get("notifications/")).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<Acknowledgement> {
        self.client
            .json(ApiRequest::patch(format!("notifications/{}/read/", id)))
            .await
    }

    pub async fn mark_all_read(&self) -> Result<Acknowledgement> {
        self.client
            .json(ApiRequest::patch("notifications/mark-all/"))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .send(ApiRequest::delete(format!("notifications/{}/delete/", id)))
            .await?;
        Ok(())
    }
}
