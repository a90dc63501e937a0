use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============= Authentication Types =============

/// Account role, which decides the dashboard a user lands on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Individual,
    Lawyer,
    Admin,
}

impl Role {
    /// Dashboard route the view layer redirects to after login.
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            Role::Admin => "/admin-dashboard",
            Role::Lawyer => "/lawyer-dashboard",
            Role::Individual => "/individual-dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Individual => write!(f, "individual"),
            Role::Lawyer => write!(f, "lawyer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "individual" => Ok(Role::Individual),
            "lawyer" => Ok(Role::Lawyer),
            "admin" => Ok(Role::Admin),
            other => Err(ClientError::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// Cached user profile, as returned by login and `auth/profile/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Token pair plus profile returned by login and registration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Body of a successful `auth/token/refresh/` call.
///
/// Backends that rotate refresh tokens also return a new `refresh` value.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshedAccess {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

// ============= Document Types =============

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Analyzed,
    Failed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Analyzed => "analyzed",
            DocumentStatus::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub risk_score: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub extracted_text: Option<String>,
}

/// Outcome of `documents/{id}/analyze/`. The scoring itself happens server-side.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisResult {
    pub document_id: i64,
    #[serde(default)]
    pub risk_score: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub clauses_found: BTreeMap<String, bool>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Report {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub risk_score: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    /// Clause name to "found and compliant".
    #[serde(default)]
    pub clauses_found: BTreeMap<String, bool>,
}

/// Clause tallies shown on the report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClauseBreakdown {
    pub total: usize,
    pub compliant: usize,
    pub needs_review: usize,
}

impl Report {
    pub fn clause_breakdown(&self) -> ClauseBreakdown {
        let compliant = self.clauses_found.values().filter(|found| **found).count();
        ClauseBreakdown {
            total: self.clauses_found.len(),
            compliant,
            needs_review: self.clauses_found.len() - compliant,
        }
    }
}

/// A file queued for upload. Kept as owned bytes so the request can be replayed.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
    pub title: Option<String>,
}

// ============= Collaboration Types =============

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentAuthor {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    pub id: i64,
    pub document_id: i64,
    pub user: CommentAuthor,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Version {
    pub id: i64,
    pub document_id: i64,
    pub version_number: u32,
    pub created_at: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub changes_summary: Option<String>,
}

// ============= Sharing & Assignment Types =============

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SharedDocument {
    pub id: i64,
    pub document_id: i64,
    pub lawyer_id: i64,
    pub client_id: i64,
    pub status: ShareStatus,
    pub lawyer_name: String,
    pub client_name: String,
    pub document_title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentAction {
    Accept,
    Reject,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Party {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssignmentRequest {
    pub id: i64,
    pub lawyer: Party,
    pub client: Party,
    pub status: AssignmentStatus,
    pub created_at: String,
    #[serde(default)]
    pub documents_count: Option<u32>,
}

/// A client as seen from the lawyer's side.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClientSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub assigned_date: String,
    pub documents_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Lawyer {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

// ============= Notification Types =============

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Activity log entry as the backend sends it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActivityLog {
    pub id: i64,
    pub action: String,
    pub timestamp: String,
    #[serde(default)]
    pub details: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Upload,
    Analysis,
    Report,
    Download,
    Auth,
    Settings,
    Other,
}

impl ActivityKind {
    /// Classify a log action by keyword. The first matching keyword wins.
    pub fn detect(action: &str) -> Self {
        let action = action.to_lowercase();
        if action.contains("upload") {
            ActivityKind::Upload
        } else if action.contains("analy") {
            ActivityKind::Analysis
        } else if action.contains("report") {
            ActivityKind::Report
        } else if action.contains("download") {
            ActivityKind::Download
        } else if action.contains("login") || action.contains("logout") {
            ActivityKind::Auth
        } else if action.contains("setting") {
            ActivityKind::Settings
        } else {
            ActivityKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Upload => "upload",
            ActivityKind::Analysis => "analysis",
            ActivityKind::Report => "report",
            ActivityKind::Download => "download",
            ActivityKind::Auth => "auth",
            ActivityKind::Settings => "settings",
            ActivityKind::Other => "other",
        }
    }
}

/// Activity log entry after client-side classification.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActivityEntry {
    pub id: i64,
    pub action: String,
    pub timestamp: String,
    pub details: Value,
    pub kind: ActivityKind,
}

impl From<ActivityLog> for ActivityEntry {
    fn from(log: ActivityLog) -> Self {
        let details = if log.details.is_null() {
            Value::Object(Default::default())
        } else {
            log.details
        };
        Self {
            id: log.id,
            kind: ActivityKind::detect(&log.action),
            action: log.action,
            timestamp: log.timestamp,
            details,
        }
    }
}

// ============= Subscription Types =============

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Premium,
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::Free => write!(f, "free"),
            Plan::Premium => write!(f, "premium"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    #[default]
    Active,
    Canceled,
    PastDue,
    Trialing,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Usage {
    pub analyses_used: u32,
    pub analyses_limit: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SubscriptionStatus {
    pub plan: Plan,
    pub status: SubscriptionState,
    #[serde(default)]
    pub current_period_end: Option<String>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl Default for SubscriptionStatus {
    /// What the dashboard assumes when the status endpoint is unavailable.
    fn default() -> Self {
        Self {
            plan: Plan::Free,
            status: SubscriptionState::Active,
            current_period_end: None,
            cancel_at_period_end: false,
            usage: Some(Usage {
                analyses_used: 0,
                analyses_limit: 3,
            }),
        }
    }
}

impl SubscriptionStatus {
    pub fn is_premium(&self) -> bool {
        self.plan == Plan::Premium && self.status == SubscriptionState::Active
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckoutSession {
    pub checkout_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BillingPortal {
    pub portal_url: String,
}

// ============= Dashboard Types =============

/// Role dashboard analytics. The backend owns the shape; `stats` is the only
/// block every dashboard renders.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Analytics {
    #[serde(default)]
    pub stats: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

// ============= Error Types =============

/// Errors surfaced by the client.
///
/// Payloads are plain strings so that one refresh failure can be handed to
/// every request waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Token refresh failed: {message}")]
    RefreshFailed { status: Option<u16>, message: String },

    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::RefreshFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// True when the credential set is gone and the user has to log in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Http { status: 401, .. }
                | ClientError::RefreshFailed { .. }
                | ClientError::Unauthorized(_)
        )
    }

    /// Build an HTTP error from a response body, preferring the backend's own message.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        ClientError::Http {
            status,
            message: error_message(status, body),
        }
    }
}

/// Pull a human readable message out of an error body.
///
/// Looks at `message`, `detail`, `error`, then the first `non_field_errors`
/// entry, and falls back to a generic status line.
pub fn error_message(status: u16, body: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "detail", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str))
                .or_else(|| {
                    v.get("non_field_errors")
                        .and_then(|errors| errors.get(0))
                        .and_then(Value::as_str)
                })
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = json!({"message": "Upload failed", "detail": "ignored"}).to_string();
        assert_eq!(error_message(400, body.as_bytes()), "Upload failed");
    }

    #[test]
    fn test_error_message_uses_detail() {
        let body = json!({"detail": "Given token not valid for any token type"}).to_string();
        assert_eq!(
            error_message(401, body.as_bytes()),
            "Given token not valid for any token type"
        );
    }

    #[test]
    fn test_error_message_non_field_errors() {
        let body = json!({"non_field_errors": ["Unable to log in"]}).to_string();
        assert_eq!(error_message(400, body.as_bytes()), "Unable to log in");
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(error_message(502, b"<html>bad gateway</html>"), "Request failed with status 502");
        assert_eq!(error_message(500, b""), "Request failed with status 500");
    }

    #[test]
    fn test_is_auth_failure() {
        assert!(ClientError::from_body(401, b"{}").is_auth_failure());
        assert!(ClientError::RefreshFailed {
            status: Some(401),
            message: "expired".to_string()
        }
        .is_auth_failure());
        assert!(!ClientError::from_body(403, b"{}").is_auth_failure());
        assert!(!ClientError::Timeout.is_auth_failure());
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(ClientError::from_body(404, b"").status(), Some(404));
        assert_eq!(
            ClientError::RefreshFailed {
                status: None,
                message: "offline".to_string()
            }
            .status(),
            None
        );
        assert_eq!(ClientError::Network("down".to_string()).status(), None);
    }

    #[test]
    fn test_role_routes_and_parsing() {
        assert_eq!(Role::Admin.dashboard_route(), "/admin-dashboard");
        assert_eq!(Role::Lawyer.dashboard_route(), "/lawyer-dashboard");
        assert_eq!(Role::Individual.dashboard_route(), "/individual-dashboard");
        assert_eq!("LAWYER".parse::<Role>().unwrap(), Role::Lawyer);
        assert!("judge".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_role_defaults_to_individual() {
        let user: User =
            serde_json::from_value(json!({"id": 7, "username": "ana", "email": "ana@example.com"}))
                .unwrap();
        assert_eq!(user.role, Role::Individual);
        assert!(!user.is_premium);
    }

    #[test]
    fn test_activity_kind_detection() {
        assert_eq!(ActivityKind::detect("Uploaded NDA.pdf"), ActivityKind::Upload);
        assert_eq!(ActivityKind::detect("Document ANALYZED"), ActivityKind::Analysis);
        assert_eq!(ActivityKind::detect("Generated report"), ActivityKind::Report);
        assert_eq!(ActivityKind::detect("Downloaded file"), ActivityKind::Download);
        assert_eq!(ActivityKind::detect("User logout"), ActivityKind::Auth);
        assert_eq!(ActivityKind::detect("Changed settings"), ActivityKind::Settings);
        assert_eq!(ActivityKind::detect("Shared document"), ActivityKind::Other);
        // first keyword wins
        assert_eq!(
            ActivityKind::detect("Upload then analysis report"),
            ActivityKind::Upload
        );
    }

    #[test]
    fn test_activity_entry_defaults_details() {
        let log = ActivityLog {
            id: 1,
            action: "Login".to_string(),
            timestamp: "2024-01-15T10:30:00Z".to_string(),
            details: Value::Null,
        };
        let entry = ActivityEntry::from(log);
        assert_eq!(entry.kind, ActivityKind::Auth);
        assert!(entry.details.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_report_clause_breakdown() {
        let report: Report = serde_json::from_value(json!({
            "id": 3,
            "title": "NDA",
            "risk_score": "Medium",
            "clauses_found": {"confidentiality": true, "liability": false, "termination": true}
        }))
        .unwrap();
        assert_eq!(
            report.clause_breakdown(),
            ClauseBreakdown {
                total: 3,
                compliant: 2,
                needs_review: 1
            }
        );
    }

    #[test]
    fn test_subscription_default_is_free_with_limit() {
        let status = SubscriptionStatus::default();
        assert_eq!(status.plan, Plan::Free);
        assert!(!status.is_premium());
        assert_eq!(status.usage.unwrap().analyses_limit, 3);
    }

    #[test]
    fn test_subscription_state_snake_case() {
        let status: SubscriptionStatus =
            serde_json::from_value(json!({"plan": "premium", "status": "past_due"})).unwrap();
        assert_eq!(status.status, SubscriptionState::PastDue);
        assert!(!status.is_premium());
    }

    #[test]
    fn test_analytics_keeps_unknown_blocks() {
        let analytics: Analytics = serde_json::from_value(json!({
            "stats": {"totalUsers": 12},
            "recentUsers": [{"id": 1}]
        }))
        .unwrap();
        assert_eq!(analytics.stats["totalUsers"], json!(12));
        assert!(analytics.extra.contains_key("recentUsers"));
    }
}
