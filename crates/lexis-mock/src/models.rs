//! Wire shapes served by the mock, matching the real backend's JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============= Accounts =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub subscription_plan: String,
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshBody {
    pub refresh: String,
}

// ============= Documents =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub file: Option<String>,
    pub risk_score: Option<String>,
    pub uploaded_at: String,
    pub analyzed_at: Option<String>,
    pub extracted_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub document_id: i64,
    pub risk_score: String,
    pub summary: String,
    pub clauses_found: BTreeMap<String, bool>,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub risk_score: Option<String>,
    pub summary: Option<String>,
    pub analyzed_at: Option<String>,
    pub clauses_found: BTreeMap<String, bool>,
}

// ============= Collaboration =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub document_id: i64,
    pub user: Author,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: i64,
    pub document_id: i64,
    pub version_number: u32,
    pub created_at: String,
    pub content: Option<String>,
    pub changes_summary: Option<String>,
}

// ============= Sharing & Assignments =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedDocument {
    pub id: i64,
    pub document_id: i64,
    pub lawyer_id: i64,
    pub client_id: i64,
    pub status: String,
    pub lawyer_name: String,
    pub client_name: String,
    pub document_title: String,
}

#[derive(Debug, Deserialize)]
pub struct ShareBody {
    pub document_id: i64,
    pub client_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Party {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub lawyer: Party,
    pub client: Party,
    pub status: String,
    pub created_at: String,
    pub documents_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub client_email: String,
}

#[derive(Debug, Deserialize)]
pub struct RespondBody {
    pub assignment_id: i64,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub assigned_date: String,
    pub documents_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lawyer {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub specialization: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// ============= Notifications & Activity =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: i64,
    pub action: String,
    pub timestamp: String,
    pub details: Value,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

// ============= Subscriptions =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub analyses_used: u32,
    pub analyses_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub plan: String,
    pub status: String,
    pub current_period_end: Option<String>,
    pub cancel_at_period_end: bool,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub plan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingPortal {
    pub portal_url: String,
}

/// `{ "message": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
