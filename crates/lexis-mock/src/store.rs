//! In-memory backend state
//!
//! One [`MockStore`] holds every account, document and token. Handlers are
//! thin wrappers around its methods; all authorization decisions happen here.

use crate::error::{MockError, Result};
use crate::models::*;
use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

pub const FREE_ANALYSIS_LIMIT: u32 = 3;
pub const PREMIUM_ANALYSIS_LIMIT: u32 = 100;

/// Clauses the canned analysis looks for: (keyword, display name).
const CLAUSES: &[(&str, &str)] = &[
    ("confidential", "Confidentiality"),
    ("termination", "Termination"),
    ("indemnif", "Indemnification"),
    ("liability", "Limitation of Liability"),
    ("governing law", "Governing Law"),
    ("payment", "Payment Terms"),
];

/// Login details of the seeded users.
#[derive(Debug, Clone, Copy)]
pub struct SeededAccount {
    pub role: &'static str,
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub const SEEDED_ACCOUNTS: &[SeededAccount] = &[
    SeededAccount {
        role: "admin",
        username: "admin",
        email: "admin@lexis.dev",
        password: "admin123",
    },
    SeededAccount {
        role: "lawyer",
        username: "jmartinez",
        email: "lawyer@lexis.dev",
        password: "lawyer123",
    },
    SeededAccount {
        role: "individual",
        username: "ana",
        email: "client@lexis.dev",
        password: "client123",
    },
];

// ============= Records =============

#[derive(Debug, Clone)]
struct UserRecord {
    id: i64,
    username: String,
    email: String,
    password: String,
    role: String,
    plan: String,
    analyses_used: u32,
    current_period_end: Option<String>,
}

impl UserRecord {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            subscription_plan: self.plan.clone(),
            is_premium: self.plan == "premium",
        }
    }

    fn to_party(&self) -> Party {
        Party {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    fn analysis_limit(&self) -> u32 {
        if self.plan == "premium" {
            PREMIUM_ANALYSIS_LIMIT
        } else {
            FREE_ANALYSIS_LIMIT
        }
    }
}

#[derive(Debug, Clone)]
struct DocumentRecord {
    id: i64,
    owner_id: i64,
    title: String,
    file_name: String,
    mime: Option<String>,
    bytes: Vec<u8>,
    status: String,
    risk_score: Option<String>,
    summary: Option<String>,
    clauses: BTreeMap<String, bool>,
    uploaded_at: String,
    analyzed_at: Option<String>,
    extracted_text: Option<String>,
}

impl DocumentRecord {
    fn to_document(&self) -> Document {
        Document {
            id: self.id,
            title: self.title.clone(),
            status: self.status.clone(),
            file: Some(format!("/media/documents/{}", self.file_name)),
            risk_score: self.risk_score.clone(),
            uploaded_at: self.uploaded_at.clone(),
            analyzed_at: self.analyzed_at.clone(),
            extracted_text: self.extracted_text.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    document_id: i64,
    user_id: i64,
    text: String,
    created_at: String,
}

#[derive(Debug, Clone)]
struct ShareRecord {
    id: i64,
    document_id: i64,
    lawyer_id: i64,
    client_id: i64,
    status: String,
}

#[derive(Debug, Clone)]
struct AssignmentRecord {
    id: i64,
    lawyer_id: i64,
    client_id: i64,
    status: String,
    created_at: String,
}

#[derive(Debug, Clone)]
struct NotificationRecord {
    id: i64,
    user_id: i64,
    message: String,
    is_read: bool,
    created_at: String,
    kind: String,
}

#[derive(Debug, Clone)]
struct LogRecord {
    id: i64,
    user_id: i64,
    action: String,
    timestamp: String,
    details: Value,
    kind: String,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    users: BTreeMap<i64, UserRecord>,
    documents: BTreeMap<i64, DocumentRecord>,
    comments: BTreeMap<i64, CommentRecord>,
    versions: BTreeMap<i64, Version>,
    shares: BTreeMap<i64, ShareRecord>,
    assignments: BTreeMap<i64, AssignmentRecord>,
    notifications: BTreeMap<i64, NotificationRecord>,
    logs: BTreeMap<i64, LogRecord>,
}

#[derive(Debug)]
struct AccessGrant {
    user_id: i64,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Tokens {
    access: HashMap<String, AccessGrant>,
    refresh: HashMap<String, i64>,
}

/// Shared mock backend state.
#[derive(Debug)]
pub struct MockStore {
    state: RwLock<State>,
    tokens: RwLock<Tokens>,
    access_ttl: Duration,
    refresh_delay: Duration,
    refresh_calls: AtomicUsize,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: i64) -> Result<&UserRecord> {
        self.users.get(&id).ok_or_else(|| MockError::not_found("User"))
    }

    fn username(&self, id: i64) -> String {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn has_accepted_assignment(&self, lawyer_id: i64, client_id: i64) -> bool {
        self.assignments.values().any(|a| {
            a.lawyer_id == lawyer_id && a.client_id == client_id && a.status == "accepted"
        })
    }

    /// Owner, admin, the client of an accepted share, or the owner's lawyer.
    fn can_view(&self, user: &User, document: &DocumentRecord) -> bool {
        document.owner_id == user.id
            || user.role == "admin"
            || self.shares.values().any(|s| {
                s.document_id == document.id && s.client_id == user.id && s.status == "accepted"
            })
            || self.has_accepted_assignment(user.id, document.owner_id)
    }

    fn visible_document(&self, user: &User, id: i64) -> Result<&DocumentRecord> {
        let document = self
            .documents
            .get(&id)
            .ok_or_else(|| MockError::not_found("Document"))?;
        if self.can_view(user, document) {
            Ok(document)
        } else {
            Err(MockError::not_found("Document"))
        }
    }

    fn documents_owned(&self, user_id: i64) -> u32 {
        self.documents
            .values()
            .filter(|d| d.owner_id == user_id)
            .count() as u32
    }

    fn comment(&self, record: &CommentRecord) -> Comment {
        Comment {
            id: record.id,
            document_id: record.document_id,
            user: Author {
                id: record.user_id,
                username: self.username(record.user_id),
            },
            text: record.text.clone(),
            created_at: record.created_at.clone(),
        }
    }

    fn shared_document(&self, record: &ShareRecord) -> SharedDocument {
        SharedDocument {
            id: record.id,
            document_id: record.document_id,
            lawyer_id: record.lawyer_id,
            client_id: record.client_id,
            status: record.status.clone(),
            lawyer_name: self.username(record.lawyer_id),
            client_name: self.username(record.client_id),
            document_title: self
                .documents
                .get(&record.document_id)
                .map(|d| d.title.clone())
                .unwrap_or_default(),
        }
    }

    fn assignment(&self, record: &AssignmentRecord) -> Result<Assignment> {
        Ok(Assignment {
            id: record.id,
            lawyer: self.user(record.lawyer_id)?.to_party(),
            client: self.user(record.client_id)?.to_party(),
            status: record.status.clone(),
            created_at: record.created_at.clone(),
            documents_count: self.documents_owned(record.client_id),
        })
    }

    fn notify(&mut self, user_id: i64, message: String, kind: &str) {
        let id = self.next_id();
        self.notifications.insert(
            id,
            NotificationRecord {
                id,
                user_id,
                message,
                is_read: false,
                created_at: now(),
                kind: kind.to_string(),
            },
        );
    }

    fn log(&mut self, user_id: i64, action: String, kind: &str, details: Value) {
        let id = self.next_id();
        self.logs.insert(
            id,
            LogRecord {
                id,
                user_id,
                action,
                timestamp: now(),
                details,
                kind: kind.to_string(),
            },
        );
    }

    fn add_user(&mut self, username: &str, email: &str, password: &str, role: &str) -> i64 {
        let id = self.next_id();
        self.users.insert(
            id,
            UserRecord {
                id,
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role: role.to_string(),
                plan: "free".to_string(),
                analyses_used: 0,
                current_period_end: None,
            },
        );
        id
    }

    fn add_document(&mut self, owner_id: i64, title: &str, file_name: &str, text: &str) -> i64 {
        let id = self.next_id();
        let uploaded_at = now();
        self.documents.insert(
            id,
            DocumentRecord {
                id,
                owner_id,
                title: title.to_string(),
                file_name: file_name.to_string(),
                mime: Some("text/plain".to_string()),
                bytes: text.as_bytes().to_vec(),
                status: "pending".to_string(),
                risk_score: None,
                summary: None,
                clauses: BTreeMap::new(),
                uploaded_at: uploaded_at.clone(),
                analyzed_at: None,
                extracted_text: Some(text.to_string()),
            },
        );
        let version_id = self.next_id();
        self.versions.insert(
            version_id,
            Version {
                id: version_id,
                document_id: id,
                version_number: 1,
                created_at: uploaded_at,
                content: Some(text.to_string()),
                changes_summary: Some("Initial upload".to_string()),
            },
        );
        id
    }

    /// Canned analysis: clause presence by keyword, risk from missing clauses.
    fn run_analysis(&mut self, id: i64) -> Result<Analysis> {
        let document = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| MockError::not_found("Document"))?;

        let text = document
            .extracted_text
            .clone()
            .unwrap_or_default()
            .to_lowercase();
        let clauses: BTreeMap<String, bool> = CLAUSES
            .iter()
            .map(|(keyword, name)| (name.to_string(), text.contains(keyword)))
            .collect();
        let missing = clauses.values().filter(|found| !**found).count();
        let score = format_score(100.0 * missing as f64 / CLAUSES.len() as f64);
        let summary = format!(
            "{} of {} standard clauses found. {}",
            CLAUSES.len() - missing,
            CLAUSES.len(),
            if missing == 0 {
                "No missing protections detected."
            } else {
                "Review the missing clauses before signing."
            }
        );
        let analyzed_at = now();

        document.status = "analyzed".to_string();
        document.risk_score = Some(score.clone());
        document.summary = Some(summary.clone());
        document.clauses = clauses.clone();
        document.analyzed_at = Some(analyzed_at.clone());

        Ok(Analysis {
            document_id: id,
            risk_score: score,
            summary,
            clauses_found: clauses,
            analyzed_at,
        })
    }
}

impl MockStore {
    /// A store seeded with the accounts in [`SEEDED_ACCOUNTS`] and sample data.
    pub fn new(access_ttl: Duration) -> Self {
        Self {
            state: RwLock::new(seed()),
            tokens: RwLock::new(Tokens::default()),
            access_ttl,
            refresh_delay: Duration::ZERO,
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// Hold every refresh response for `delay` before answering.
    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_delay(&self) -> Duration {
        self.refresh_delay
    }

    // ============= Tokens =============

    fn issue_tokens(&self, user: &UserRecord) -> TokenPair {
        let access = format!("access-{}", Uuid::new_v4().simple());
        let refresh = format!("refresh-{}", Uuid::new_v4().simple());

        let mut tokens = self.tokens.write();
        tokens.access.insert(
            access.clone(),
            AccessGrant {
                user_id: user.id,
                expires_at: Instant::now() + self.access_ttl,
            },
        );
        tokens.refresh.insert(refresh.clone(), user.id);

        TokenPair {
            access,
            refresh,
            user: user.to_user(),
        }
    }

    /// Resolve a bearer token to its user.
    pub fn authenticate(&self, access_token: &str) -> Result<User> {
        let user_id = {
            let tokens = self.tokens.read();
            let grant = tokens
                .access
                .get(access_token)
                .ok_or_else(MockError::invalid_token)?;
            if grant.expires_at <= Instant::now() {
                return Err(MockError::invalid_token());
            }
            grant.user_id
        };

        let state = self.state.read();
        state
            .users
            .get(&user_id)
            .map(UserRecord::to_user)
            .ok_or_else(MockError::invalid_token)
    }

    pub fn login(&self, body: &LoginBody) -> Result<TokenPair> {
        let user = {
            let state = self.state.read();
            state
                .users
                .values()
                .find(|u| u.email.eq_ignore_ascii_case(body.email.trim()) && u.password == body.password)
                .cloned()
                .ok_or_else(|| {
                    MockError::Unauthorized(
                        "No active account found with the given credentials".to_string(),
                    )
                })?
        };

        self.state
            .write()
            .log(user.id, "User login".to_string(), "auth", json!({}));
        info!(user_id = user.id, "Mock login");
        Ok(self.issue_tokens(&user))
    }

    pub fn register(&self, body: &RegisterBody) -> Result<TokenPair> {
        let username = body.username.trim();
        let email = body.email.trim();
        if username.is_empty() || email.is_empty() || !email.contains('@') {
            return Err(MockError::BadRequest(
                "A username and a valid email are required".to_string(),
            ));
        }
        if body.password.len() < 6 {
            return Err(MockError::BadRequest(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        let role = body.role.as_deref().unwrap_or("individual");
        if !matches!(role, "individual" | "lawyer") {
            return Err(MockError::BadRequest(format!(
                "Role '{}' cannot be self-assigned",
                role
            )));
        }

        let user = {
            let mut state = self.state.write();
            if state.users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
                return Err(MockError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
            let id = state.add_user(username, email, &body.password, role);
            state.log(id, "Account created".to_string(), "auth", json!({}));
            state.user(id)?.clone()
        };

        info!(user_id = user.id, role = %user.role, "Mock registration");
        Ok(self.issue_tokens(&user))
    }

    /// Exchange a refresh token for a new access token. Refresh tokens are not rotated.
    pub fn refresh(&self, refresh_token: &str) -> Result<AccessToken> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);

        let mut tokens = self.tokens.write();
        let user_id = *tokens.refresh.get(refresh_token).ok_or_else(|| {
            MockError::Unauthorized("Token is invalid or expired".to_string())
        })?;

        let access = format!("access-{}", Uuid::new_v4().simple());
        tokens.access.insert(
            access.clone(),
            AccessGrant {
                user_id,
                expires_at: Instant::now() + self.access_ttl,
            },
        );
        debug!(user_id, "Issued refreshed access token");
        Ok(AccessToken { access })
    }

    /// Invalidate every access token, as if all of them had expired.
    pub fn expire_access_tokens(&self) {
        self.tokens.write().access.clear();
    }

    /// Invalidate every refresh token, forcing a fresh login.
    pub fn revoke_refresh_tokens(&self) {
        self.tokens.write().refresh.clear();
    }

    /// Number of calls the refresh endpoint has received.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn profile(&self, user: &User) -> Result<User> {
        Ok(self.state.read().user(user.id)?.to_user())
    }

    // ============= Documents =============

    pub fn documents(&self, user: &User) -> Vec<Document> {
        let state = self.state.read();
        let mut documents: Vec<Document> = state
            .documents
            .values()
            .filter(|d| d.owner_id == user.id)
            .map(DocumentRecord::to_document)
            .collect();
        documents.reverse();
        documents
    }

    pub fn document(&self, user: &User, id: i64) -> Result<Document> {
        Ok(self.state.read().visible_document(user, id)?.to_document())
    }

    pub fn upload(
        &self,
        user: &User,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
        title: Option<String>,
    ) -> Result<Document> {
        if bytes.is_empty() {
            return Err(MockError::BadRequest("The submitted file is empty.".to_string()));
        }

        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| file_name.clone());
        let text = String::from_utf8(bytes.clone())
            .ok()
            .map(|t| t.chars().take(5000).collect::<String>());

        let mut state = self.state.write();
        let id = state.add_document(user.id, &title, &file_name, text.as_deref().unwrap_or(""));
        if let Some(document) = state.documents.get_mut(&id) {
            document.mime = mime;
            document.bytes = bytes;
            document.extracted_text = text;
        }
        state.log(
            user.id,
            format!("Uploaded document {}", title),
            "upload",
            json!({ "document_id": id }),
        );

        let document = state
            .documents
            .get(&id)
            .map(DocumentRecord::to_document)
            .ok_or_else(|| MockError::not_found("Document"))?;
        info!(document_id = id, "Mock upload");
        Ok(document)
    }

    pub fn analyze(&self, user: &User, id: i64) -> Result<Analysis> {
        let mut state = self.state.write();
        let document = state.visible_document(user, id)?;
        if document.owner_id != user.id {
            return Err(MockError::Forbidden(
                "Only the owner can analyze a document".to_string(),
            ));
        }
        let title = document.title.clone();

        let account = state.user(user.id)?;
        if account.analyses_used >= account.analysis_limit() {
            return Err(MockError::Forbidden(
                "Analysis limit reached for your plan. Upgrade to premium for more analyses."
                    .to_string(),
            ));
        }

        let analysis = state.run_analysis(id)?;
        if let Some(account) = state.users.get_mut(&user.id) {
            account.analyses_used += 1;
        }
        state.log(
            user.id,
            format!("Analyzed document {}", title),
            "analysis",
            json!({ "document_id": id, "risk_score": analysis.risk_score }),
        );
        state.notify(
            user.id,
            format!("Analysis complete for \"{}\"", title),
            "analysis",
        );
        Ok(analysis)
    }

    pub fn report(&self, user: &User, id: i64) -> Result<Report> {
        let mut state = self.state.write();
        let document = state.visible_document(user, id)?;
        if document.status != "analyzed" {
            return Err(MockError::BadRequest(
                "Document has not been analyzed yet".to_string(),
            ));
        }
        let report = Report {
            id: document.id,
            title: document.title.clone(),
            risk_score: document.risk_score.clone(),
            summary: document.summary.clone(),
            analyzed_at: document.analyzed_at.clone(),
            clauses_found: document.clauses.clone(),
        };
        state.log(
            user.id,
            format!("Viewed report for {}", report.title),
            "report",
            json!({ "document_id": id }),
        );
        Ok(report)
    }

    /// File bytes, MIME type and file name.
    pub fn download(&self, user: &User, id: i64) -> Result<(Vec<u8>, Option<String>, String)> {
        let mut state = self.state.write();
        let document = state.visible_document(user, id)?;
        let file = (
            document.bytes.clone(),
            document.mime.clone(),
            document.file_name.clone(),
        );
        let title = document.title.clone();
        state.log(
            user.id,
            format!("Downloaded document {}", title),
            "download",
            json!({ "document_id": id }),
        );
        Ok(file)
    }

    // ============= Collaboration =============

    pub fn comments(&self, user: &User, document_id: i64) -> Result<Vec<Comment>> {
        let state = self.state.read();
        state.visible_document(user, document_id)?;
        Ok(state
            .comments
            .values()
            .filter(|c| c.document_id == document_id)
            .map(|c| state.comment(c))
            .collect())
    }

    pub fn add_comment(&self, user: &User, document_id: i64, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MockError::BadRequest("Comment text is required".to_string()));
        }

        let mut state = self.state.write();
        state.visible_document(user, document_id)?;
        let id = state.next_id();
        let record = CommentRecord {
            id,
            document_id,
            user_id: user.id,
            text: text.to_string(),
            created_at: now(),
        };
        let comment = state.comment(&record);
        state.comments.insert(id, record);
        Ok(comment)
    }

    pub fn delete_comment(&self, user: &User, comment_id: i64) -> Result<()> {
        let mut state = self.state.write();
        let comment = state
            .comments
            .get(&comment_id)
            .ok_or_else(|| MockError::not_found("Comment"))?;
        if comment.user_id != user.id && user.role != "admin" {
            return Err(MockError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }
        state.comments.remove(&comment_id);
        Ok(())
    }

    pub fn versions(&self, user: &User, document_id: i64) -> Result<Vec<Version>> {
        let state = self.state.read();
        state.visible_document(user, document_id)?;
        let mut versions: Vec<Version> = state
            .versions
            .values()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    pub fn version(&self, user: &User, version_id: i64) -> Result<Version> {
        let state = self.state.read();
        let version = state
            .versions
            .get(&version_id)
            .ok_or_else(|| MockError::not_found("Version"))?;
        state.visible_document(user, version.document_id)?;
        Ok(version.clone())
    }

    // ============= Sharing =============

    pub fn share(&self, user: &User, body: &ShareBody) -> Result<SharedDocument> {
        if user.role != "lawyer" {
            return Err(MockError::Forbidden(
                "Only lawyers can share documents".to_string(),
            ));
        }

        let mut state = self.state.write();
        let document = state
            .documents
            .get(&body.document_id)
            .ok_or_else(|| MockError::not_found("Document"))?;
        if document.owner_id != user.id {
            return Err(MockError::Forbidden(
                "You can only share your own documents".to_string(),
            ));
        }
        let title = document.title.clone();
        state.user(body.client_id)?;
        if state.shares.values().any(|s| {
            s.document_id == body.document_id && s.client_id == body.client_id && s.status != "declined"
        }) {
            return Err(MockError::Conflict(
                "Document is already shared with this client".to_string(),
            ));
        }

        let id = state.next_id();
        let record = ShareRecord {
            id,
            document_id: body.document_id,
            lawyer_id: user.id,
            client_id: body.client_id,
            status: "pending".to_string(),
        };
        let shared = state.shared_document(&record);
        state.shares.insert(id, record);
        state.notify(
            body.client_id,
            format!("{} shared \"{}\" with you", user.username, title),
            "share",
        );
        Ok(shared)
    }

    pub fn respond_share(&self, user: &User, share_id: i64, accept: bool) -> Result<SharedDocument> {
        let mut state = self.state.write();
        let share = state
            .shares
            .get_mut(&share_id)
            .ok_or_else(|| MockError::not_found("Share"))?;
        if share.client_id != user.id {
            return Err(MockError::not_found("Share"));
        }
        if share.status != "pending" {
            return Err(MockError::BadRequest(format!(
                "Share has already been {}",
                share.status
            )));
        }
        share.status = if accept { "accepted" } else { "declined" }.to_string();
        let record = share.clone();

        let shared = state.shared_document(&record);
        state.notify(
            record.lawyer_id,
            format!(
                "{} {} \"{}\"",
                user.username, record.status, shared.document_title
            ),
            "share",
        );
        Ok(shared)
    }

    pub fn shared_by(&self, user: &User) -> Vec<SharedDocument> {
        let state = self.state.read();
        state
            .shares
            .values()
            .filter(|s| s.lawyer_id == user.id)
            .map(|s| state.shared_document(s))
            .collect()
    }

    pub fn shared_with(&self, user: &User) -> Vec<SharedDocument> {
        let state = self.state.read();
        state
            .shares
            .values()
            .filter(|s| s.client_id == user.id)
            .map(|s| state.shared_document(s))
            .collect()
    }

    // ============= Lawyer / client assignments =============

    pub fn assign_client(&self, user: &User, client_email: &str) -> Result<Assignment> {
        if user.role != "lawyer" {
            return Err(MockError::Forbidden(
                "Only lawyers can assign clients".to_string(),
            ));
        }

        let mut state = self.state.write();
        let client_id = state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(client_email.trim()))
            .map(|u| u.id)
            .ok_or_else(|| MockError::NotFound("No user found with this email".to_string()))?;
        if client_id == user.id {
            return Err(MockError::BadRequest(
                "You cannot assign yourself as a client".to_string(),
            ));
        }
        if state.assignments.values().any(|a| {
            a.lawyer_id == user.id && a.client_id == client_id && a.status != "rejected"
        }) {
            return Err(MockError::Conflict(
                "An assignment with this client already exists".to_string(),
            ));
        }

        let id = state.next_id();
        let record = AssignmentRecord {
            id,
            lawyer_id: user.id,
            client_id,
            status: "pending".to_string(),
            created_at: now(),
        };
        let assignment = state.assignment(&record)?;
        state.assignments.insert(id, record);
        state.notify(
            client_id,
            format!("{} wants to add you as a client", user.username),
            "assignment",
        );
        Ok(assignment)
    }

    pub fn respond_assignment(&self, user: &User, body: &RespondBody) -> Result<Message> {
        let accept = match body.action.as_str() {
            "accept" => true,
            "reject" => false,
            other => {
                return Err(MockError::BadRequest(format!(
                    "Unknown action '{}', expected accept or reject",
                    other
                )))
            }
        };

        let mut state = self.state.write();
        let assignment = state
            .assignments
            .get_mut(&body.assignment_id)
            .ok_or_else(|| MockError::not_found("Assignment"))?;
        if assignment.client_id != user.id {
            return Err(MockError::not_found("Assignment"));
        }
        if assignment.status != "pending" {
            return Err(MockError::BadRequest(format!(
                "Assignment has already been {}",
                assignment.status
            )));
        }
        assignment.status = if accept { "accepted" } else { "rejected" }.to_string();
        let lawyer_id = assignment.lawyer_id;
        let status = assignment.status.clone();

        state.notify(
            lawyer_id,
            format!("{} {} your assignment request", user.username, status),
            "assignment",
        );
        Ok(Message::new(format!("Assignment {}", status)))
    }

    pub fn lawyer_clients(&self, user: &User) -> Result<Vec<ClientSummary>> {
        let state = self.state.read();
        state
            .assignments
            .values()
            .filter(|a| a.lawyer_id == user.id && a.status == "accepted")
            .map(|a| {
                let client = state.user(a.client_id)?;
                Ok(ClientSummary {
                    id: client.id,
                    username: client.username.clone(),
                    email: client.email.clone(),
                    assigned_date: a.created_at.clone(),
                    documents_count: state.documents_owned(client.id),
                })
            })
            .collect()
    }

    pub fn client_lawyer(&self, user: &User) -> Result<Lawyer> {
        let state = self.state.read();
        let assignment = state
            .assignments
            .values()
            .find(|a| a.client_id == user.id && a.status == "accepted")
            .ok_or_else(|| MockError::NotFound("No lawyer assigned".to_string()))?;
        let lawyer = state.user(assignment.lawyer_id)?;
        Ok(Lawyer {
            id: lawyer.id,
            username: lawyer.username.clone(),
            email: lawyer.email.clone(),
            specialization: Some("Contract law".to_string()),
        })
    }

    pub fn client_requests(&self, user: &User) -> Result<Vec<Assignment>> {
        let state = self.state.read();
        state
            .assignments
            .values()
            .filter(|a| a.client_id == user.id && a.status == "pending")
            .map(|a| state.assignment(a))
            .collect()
    }

    pub fn lawyer_requests(&self, user: &User) -> Result<Vec<Assignment>> {
        let state = self.state.read();
        state
            .assignments
            .values()
            .filter(|a| a.lawyer_id == user.id)
            .map(|a| state.assignment(a))
            .collect()
    }

    pub fn search_users(&self, user: &User, query: &str) -> Result<Vec<Party>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(MockError::BadRequest("Search query is required".to_string()));
        }
        let state = self.state.read();
        Ok(state
            .users
            .values()
            .filter(|u| u.id != user.id)
            .filter(|u| {
                u.username.to_lowercase().contains(&query) || u.email.to_lowercase().contains(&query)
            })
            .map(UserRecord::to_party)
            .collect())
    }

    // ============= Notifications & activity =============

    pub fn notifications(&self, user: &User) -> Vec<Notification> {
        let state = self.state.read();
        state
            .notifications
            .values()
            .rev()
            .filter(|n| n.user_id == user.id)
            .map(|n| Notification {
                id: n.id,
                message: n.message.clone(),
                is_read: n.is_read,
                created_at: n.created_at.clone(),
                kind: n.kind.clone(),
            })
            .collect()
    }

    pub fn mark_notification_read(&self, user: &User, id: i64) -> Result<Message> {
        let mut state = self.state.write();
        match state.notifications.get_mut(&id) {
            Some(n) if n.user_id == user.id => {
                n.is_read = true;
                Ok(Message::new("Notification marked as read"))
            }
            _ => Err(MockError::not_found("Notification")),
        }
    }

    pub fn mark_all_read(&self, user: &User) -> Message {
        let mut state = self.state.write();
        let mut updated = 0;
        for n in state.notifications.values_mut() {
            if n.user_id == user.id && !n.is_read {
                n.is_read = true;
                updated += 1;
            }
        }
        Message::new(format!("{} notifications marked as read", updated))
    }

    pub fn delete_notification(&self, user: &User, id: i64) -> Result<()> {
        let mut state = self.state.write();
        let owned = state
            .notifications
            .get(&id)
            .is_some_and(|n| n.user_id == user.id);
        if !owned {
            return Err(MockError::not_found("Notification"));
        }
        state.notifications.remove(&id);
        Ok(())
    }

    pub fn activity(&self, user: &User, kind: Option<&str>) -> Vec<ActivityLog> {
        let state = self.state.read();
        state
            .logs
            .values()
            .rev()
            .filter(|l| l.user_id == user.id)
            .filter(|l| kind.map_or(true, |k| k.is_empty() || l.kind == k))
            .map(|l| ActivityLog {
                id: l.id,
                action: l.action.clone(),
                timestamp: l.timestamp.clone(),
                details: l.details.clone(),
                kind: l.kind.clone(),
            })
            .collect()
    }

    // ============= Subscriptions =============

    pub fn subscription_status(&self, user: &User) -> Result<SubscriptionStatus> {
        let state = self.state.read();
        let account = state.user(user.id)?;
        Ok(SubscriptionStatus {
            plan: account.plan.clone(),
            status: "active".to_string(),
            current_period_end: account.current_period_end.clone(),
            cancel_at_period_end: false,
            usage: Usage {
                analyses_used: account.analyses_used,
                analyses_limit: account.analysis_limit(),
            },
        })
    }

    /// Checkout completes immediately; the plan switches before the URL is returned.
    pub fn checkout(&self, user: &User, plan: &str) -> Result<CheckoutSession> {
        if !matches!(plan, "free" | "premium") {
            return Err(MockError::BadRequest(format!("Unknown plan '{}'", plan)));
        }
        let mut state = self.state.write();
        let account = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| MockError::not_found("User"))?;
        account.plan = plan.to_string();
        account.current_period_end = if plan == "premium" {
            Some((Utc::now() + chrono::Duration::days(30)).to_rfc3339_opts(SecondsFormat::Secs, true))
        } else {
            None
        };
        state.log(
            user.id,
            format!("Subscription settings changed to {}", plan),
            "settings",
            json!({ "plan": plan }),
        );

        Ok(CheckoutSession {
            checkout_url: format!("https://checkout.lexis.test/session/{}", Uuid::new_v4().simple()),
        })
    }

    pub fn billing_portal(&self, user: &User) -> Result<BillingPortal> {
        let state = self.state.read();
        if state.user(user.id)?.plan != "premium" {
            return Err(MockError::BadRequest("No active subscription".to_string()));
        }
        Ok(BillingPortal {
            portal_url: format!("https://billing.lexis.test/portal/{}", user.id),
        })
    }

    // ============= Analytics =============

    pub fn admin_analytics(&self, user: &User) -> Result<Value> {
        if user.role != "admin" {
            return Err(MockError::Forbidden("Admin access required".to_string()));
        }
        let state = self.state.read();
        let analyzed = state
            .documents
            .values()
            .filter(|d| d.status == "analyzed")
            .count();
        let recent: Vec<Value> = state
            .documents
            .values()
            .rev()
            .take(5)
            .map(|d| json!({ "id": d.id, "title": d.title, "status": d.status }))
            .collect();

        Ok(json!({
            "stats": {
                "total_users": state.users.len(),
                "total_documents": state.documents.len(),
                "analyzed_documents": analyzed,
                "premium_users": state.users.values().filter(|u| u.plan == "premium").count(),
            },
            "recent_documents": recent,
        }))
    }

    pub fn lawyer_analytics(&self, user: &User) -> Result<Value> {
        if user.role != "lawyer" {
            return Err(MockError::Forbidden("Lawyer access required".to_string()));
        }
        let state = self.state.read();
        let shares: Vec<&ShareRecord> = state
            .shares
            .values()
            .filter(|s| s.lawyer_id == user.id)
            .collect();

        Ok(json!({
            "stats": {
                "total_clients": state.assignments.values()
                    .filter(|a| a.lawyer_id == user.id && a.status == "accepted")
                    .count(),
                "shared_documents": shares.len(),
                "pending_shares": shares.iter().filter(|s| s.status == "pending").count(),
                "pending_requests": state.assignments.values()
                    .filter(|a| a.lawyer_id == user.id && a.status == "pending")
                    .count(),
            }
        }))
    }
}

/// Seed accounts, an accepted lawyer/client pair, documents and notifications.
fn seed() -> State {
    let mut state = State::default();

    let mut ids = SEEDED_ACCOUNTS
        .iter()
        .map(|a| state.add_user(a.username, a.email, a.password, a.role))
        .collect::<Vec<_>>()
        .into_iter();
    let (_admin, lawyer, client) = match (ids.next(), ids.next(), ids.next()) {
        (Some(a), Some(l), Some(c)) => (a, l, c),
        _ => return state,
    };

    let assignment = state.next_id();
    state.assignments.insert(
        assignment,
        AssignmentRecord {
            id: assignment,
            lawyer_id: lawyer,
            client_id: client,
            status: "accepted".to_string(),
            created_at: now(),
        },
    );

    let employment = state.add_document(
        client,
        "Employment Agreement",
        "employment_agreement.txt",
        "This Employment Agreement sets out payment terms, termination rights and \
         confidentiality obligations. It is subject to the governing law of the State of New York.",
    );
    let _ = state.run_analysis(employment);
    if let Some(account) = state.users.get_mut(&client) {
        account.analyses_used = 1;
    }
    state.add_document(
        client,
        "Office Lease",
        "office_lease.txt",
        "The tenant shall pay rent monthly. Either party may seek indemnification for losses.",
    );
    let nda = state.add_document(
        lawyer,
        "Mutual NDA Template",
        "mutual_nda.txt",
        "Each party shall keep Confidential Information confidential. Liability is limited \
         to direct damages. Termination requires thirty days notice.",
    );

    let share = state.next_id();
    state.shares.insert(
        share,
        ShareRecord {
            id: share,
            document_id: nda,
            lawyer_id: lawyer,
            client_id: client,
            status: "pending".to_string(),
        },
    );

    state.notify(client, "Welcome to Lexis".to_string(), "system");
    if let Some(n) = state.notifications.values_mut().last() {
        n.is_read = true;
    }
    state.notify(
        client,
        "Analysis complete for \"Employment Agreement\"".to_string(),
        "analysis",
    );
    state.notify(
        client,
        "jmartinez shared \"Mutual NDA Template\" with you".to_string(),
        "share",
    );
    state.log(
        client,
        "Uploaded document Employment Agreement".to_string(),
        "upload",
        json!({ "document_id": employment }),
    );
    state.log(
        client,
        "Analyzed document Employment Agreement".to_string(),
        "analysis",
        json!({ "document_id": employment }),
    );

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MockStore {
        MockStore::new(Duration::from_secs(300))
    }

    fn login(store: &MockStore, email: &str, password: &str) -> TokenPair {
        store
            .login(&LoginBody {
                email: email.to_string(),
                password: password.to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_seeded_accounts_can_log_in() {
        let store = store();
        for account in SEEDED_ACCOUNTS {
            let pair = login(&store, account.email, account.password);
            assert_eq!(pair.user.role, account.role);
            assert_eq!(store.authenticate(&pair.access).unwrap().id, pair.user.id);
        }
    }

    #[test]
    fn test_bad_password_is_unauthorized() {
        let store = store();
        let err = store
            .login(&LoginBody {
                email: "client@lexis.dev".to_string(),
                password: "wrong".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, MockError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_access_token_is_rejected_and_refresh_recovers() {
        let store = store();
        let pair = login(&store, "client@lexis.dev", "client123");

        store.expire_access_tokens();
        assert_eq!(
            store.authenticate(&pair.access).unwrap_err(),
            MockError::invalid_token()
        );

        let refreshed = store.refresh(&pair.refresh).unwrap();
        assert_ne!(refreshed.access, pair.access);
        assert_eq!(store.authenticate(&refreshed.access).unwrap().id, pair.user.id);
        assert_eq!(store.refresh_calls(), 1);
    }

    #[test]
    fn test_zero_ttl_tokens_expire_immediately() {
        let store = MockStore::new(Duration::ZERO);
        let pair = login(&store, "client@lexis.dev", "client123");
        assert!(store.authenticate(&pair.access).is_err());
    }

    #[test]
    fn test_revoked_refresh_token_fails() {
        let store = store();
        let pair = login(&store, "client@lexis.dev", "client123");
        store.revoke_refresh_tokens();
        assert!(matches!(
            store.refresh(&pair.refresh),
            Err(MockError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_free_plan_analysis_limit() {
        let store = store();
        let pair = login(&store, "client@lexis.dev", "client123");
        let user = pair.user;

        // seeded with one analysis used
        let documents = store.documents(&user);
        let id = documents[0].id;
        store.analyze(&user, id).unwrap();
        store.analyze(&user, id).unwrap();
        let err = store.analyze(&user, id).unwrap_err();
        assert!(matches!(err, MockError::Forbidden(_)));

        store.checkout(&user, "premium").unwrap();
        assert!(store.analyze(&user, id).is_ok());
        assert_eq!(store.subscription_status(&user).unwrap().plan, "premium");
    }

    #[test]
    fn test_canned_analysis_scores_missing_clauses() {
        let store = store();
        let user = login(&store, "client@lexis.dev", "client123").user;
        let document = store
            .upload(
                &user,
                "full.txt".to_string(),
                None,
                b"confidential termination indemnification liability governing law payment".to_vec(),
                None,
            )
            .unwrap();
        let analysis = store.analyze(&user, document.id).unwrap();
        assert_eq!(analysis.risk_score, "0.0");
        assert!(analysis.clauses_found.values().all(|found| *found));
        assert_eq!(store.document(&user, document.id).unwrap().status, "analyzed");
    }

    #[test]
    fn test_documents_are_private_to_owner() {
        let store = store();
        let admin = login(&store, "admin@lexis.dev", "admin123").user;
        let client = login(&store, "client@lexis.dev", "client123").user;
        let stranger = store
            .register(&RegisterBody {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                password: "secret1".to_string(),
                role: None,
            })
            .unwrap()
            .user;

        let id = store.documents(&client)[0].id;
        assert!(store.document(&admin, id).is_ok());
        assert!(matches!(
            store.document(&stranger, id),
            Err(MockError::NotFound(_))
        ));
    }

    #[test]
    fn test_assignment_flow() {
        let store = store();
        let lawyer = login(&store, "lawyer@lexis.dev", "lawyer123").user;
        let newcomer = store
            .register(&RegisterBody {
                username: "carla".to_string(),
                email: "carla@example.com".to_string(),
                password: "secret1".to_string(),
                role: Some("individual".to_string()),
            })
            .unwrap()
            .user;

        let request = store.assign_client(&lawyer, "carla@example.com").unwrap();
        assert_eq!(request.status, "pending");
        assert!(matches!(
            store.assign_client(&lawyer, "carla@example.com"),
            Err(MockError::Conflict(_))
        ));
        assert_eq!(store.client_requests(&newcomer).unwrap().len(), 1);

        store
            .respond_assignment(
                &newcomer,
                &RespondBody {
                    assignment_id: request.id,
                    action: "accept".to_string(),
                },
            )
            .unwrap();
        assert_eq!(store.client_lawyer(&newcomer).unwrap().id, lawyer.id);
        assert_eq!(store.lawyer_clients(&lawyer).unwrap().len(), 2);
    }

    #[test]
    fn test_register_rejects_duplicates_and_admin_role() {
        let store = store();
        let duplicate = store.register(&RegisterBody {
            username: "ana2".to_string(),
            email: "CLIENT@lexis.dev".to_string(),
            password: "secret1".to_string(),
            role: None,
        });
        assert!(matches!(duplicate, Err(MockError::Conflict(_))));

        let admin = store.register(&RegisterBody {
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: "secret1".to_string(),
            role: Some("admin".to_string()),
        });
        assert!(matches!(admin, Err(MockError::BadRequest(_))));
    }
}
