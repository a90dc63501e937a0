//! Lawyer/client assignments
//!
//! A lawyer invites a client by email; the client accepts or rejects the
//! request. Once accepted, the pair shows up in each other's lists.

use crate::http::{ApiClient, ApiRequest};
use crate::types::{
    Acknowledgement, AssignmentAction, AssignmentRequest, ClientError, ClientSummary, Lawyer,
    Party, Result,
};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LawyersApi {
    client: Arc<ApiClient>,
}

impl LawyersApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Lawyer side: invite a client by email.
    pub async fn assign_client(&self, client_email: &str) -> Result<AssignmentRequest> {
        let request = ApiRequest::post("users/lawyers/assign-client/")
            .json(&json!({ "client_email": client_email }))?;
        self.client.json(request).await
    }

    /// Client side: accept or reject a pending request.
    pub async fn respond(
        &self,
        assignment_id: i64,
        action: AssignmentAction,
    ) -> Result<Acknowledgement> {
        let request = ApiRequest::post("users/clients/assignment/respond/")
            .json(&json!({ "assignment_id": assignment_id, "action": action }))?;
        self.client.json(request).await
    }

    /// Lawyer side: accepted clients.
    pub async fn clients(&self) -> Result<Vec<ClientSummary>> {
        self.client
            .json(ApiRequest::get("users/lawyers/clients/"))
            .await
    }

    /// Client side: the assigned lawyer, `None` when there is none.
    pub async fn my_lawyer(&self) -> Result<Option<Lawyer>> {
        match self
            .client
            .json::<Lawyer>(ApiRequest::get("users/clients/lawyer/"))
            .await
        {
            Ok(lawyer) => Ok(Some(lawyer)),
            Err(ClientError::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Client side: requests waiting for an answer.
    pub async fn pending_requests(&self) -> Result<Vec<AssignmentRequest>> {
        self.client
            .json(ApiRequest::get("users/clients/assignment-requests/"))
            .await
    }

    /// Lawyer side: requests this lawyer has sent.
    pub async fn sent_requests(&self) -> Result<Vec<AssignmentRequest>> {
        self.client
            .json(ApiRequest::get("users/lawyers/assignment-requests/"))
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Party>> {
        self.client
            .json(ApiRequest::get("users/search/").query("q", query))
            .await
    }
}
