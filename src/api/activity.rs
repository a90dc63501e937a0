use crate::http::{ApiClient, ApiRequest};
use crate::types::{ActivityEntry, ActivityLog, Result};
use std::sync::Arc;

/// Activity log, classified by action text on the way in.
#[derive(Debug, Clone)]
pub struct ActivityApi {
    client: Arc<ApiClient>,
}

impl ActivityApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<ActivityEntry>> {
        self.fetch(ApiRequest::get("notifications/logs/")).await
    }

    /// Server-side filter on the log type.
    pub async fn filter(&self, kind: &str) -> Result<Vec<ActivityEntry>> {
        self.fetch(ApiRequest::get("notifications/logs/").query("type", kind))
            .await
    }

    async fn fetch(&self, request: ApiRequest) -> Result<Vec<ActivityEntry>> {
        let logs: Vec<ActivityLog> = self.client.json(request).await?;
        Ok(logs.into_iter().map(ActivityEntry::from).collect())
    }
}
