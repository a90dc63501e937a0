use crate::http::{ApiClient, ApiRequest};
use crate::types::{BillingPortal, CheckoutSession, Plan, Result, SubscriptionStatus};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct SubscriptionsApi {
    client: Arc<ApiClient>,
}

impl SubscriptionsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn create_checkout(&self, plan: Plan) -> Result<CheckoutSession> {
        let request =
            ApiRequest::post("subscriptions/create-checkout/").json(&json!({ "plan": plan }))?;
        self.client.json(request).await
    }

    /// Current plan and usage.
    ///
    /// Never fails: any error yields [`SubscriptionStatus::default`], the
    /// free plan with no analyses used.
    pub async fn status(&self) -> SubscriptionStatus {
        match self
            .client
            .json::<SubscriptionStatus>(ApiRequest::get("subscriptions/status/"))
            .await
        {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Subscription status unavailable, assuming free plan");
                SubscriptionStatus::default()
            }
        }
    }

    pub async fn billing_portal(&self) -> Result<BillingPortal> {
        self.client
            .json(ApiRequest::post("subscriptions/portal/"))
            .await
    }
}
