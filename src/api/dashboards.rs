use crate::http::{ApiClient, ApiRequest};
use crate::types::{Analytics, Result};
use std::sync::Arc;

/// Role dashboards. Analytics are passed through as the backend shapes them.
#[derive(Debug, Clone)]
pub struct DashboardsApi {
    client: Arc<ApiClient>,
}

impl DashboardsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn admin_analytics(&self) -> Result<Analytics> {
        self.client
            .json(ApiRequest::get("documents/admin/analytics/"))
            .await
    }

    pub async fn lawyer_analytics(&self) -> Result<Analytics> {
        self.client
            .json(ApiRequest::get("documents/lawyer/analytics/"))
            .await
    }
}
