//! Command handlers
//!
//! Each handler talks to the backend through [`Lexis`] and renders with
//! [`Output`]. Errors bubble up to `main`, which prints them and, for
//! terminal auth failures, the re-login hint.

use super::output::Output;
use super::{
    ClientCommands, CommentCommands, DocumentCommands, NotificationCommands, ShareCommands,
    SubscriptionCommands, VersionCommands,
};
use anyhow::{bail, Context};
use lexis::utils::format::{format_date, truncate};
use lexis::{
    AssignmentAction, Credentials, Lexis, Plan, RegisterRequest, Role, SharedDocument,
    SubscriptionStatus, UploadFile, User,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub async fn login(
    lexis: &Lexis,
    output: &Output,
    email: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = password_or_prompt(password)?;
    let tokens = lexis.auth().login(&Credentials { email, password }).await?;

    output.success(&format!("Signed in as {}", tokens.user.username));
    output.kv("Role", &tokens.user.role.to_string());
    output.kv("Dashboard", tokens.user.role.dashboard_route());
    Ok(())
}

pub async fn register(
    lexis: &Lexis,
    output: &Output,
    request: RegisterRequest,
) -> anyhow::Result<()> {
    let tokens = lexis.auth().register(&request).await?;
    output.success(&format!(
        "Created {} account for {}",
        tokens.user.role, tokens.user.username
    ));
    Ok(())
}

pub fn registration(
    username: String,
    email: String,
    password: Option<String>,
    role: Role,
) -> anyhow::Result<RegisterRequest> {
    Ok(RegisterRequest {
        username,
        email,
        password: password_or_prompt(password)?,
        role,
    })
}

pub fn logout(lexis: &Lexis, output: &Output) -> anyhow::Result<()> {
    lexis.auth().logout()?;
    output.success("Signed out");
    Ok(())
}

pub async fn whoami(lexis: &Lexis, output: &Output, refresh: bool) -> anyhow::Result<()> {
    let user = if refresh {
        Some(lexis.auth().refresh_profile().await?)
    } else {
        lexis.session().current_user()
    };

    match user {
        Some(user) => print_user(output, &user, lexis.session().is_premium_cached()),
        None if lexis.session().is_authenticated() => {
            output.warning("Signed in, but no profile is cached");
            output.hint("Run `lexis whoami --refresh` to fetch it");
        }
        None => output.info("Not signed in"),
    }
    Ok(())
}

fn print_user(output: &Output, user: &User, premium: bool) {
    output.header(&user.username);
    output.kv("ID", &user.id.to_string());
    output.kv("Email", &user.email);
    output.kv("Role", &user.role.to_string());
    output.kv("Plan", if premium { "premium" } else { "free" });
}

pub async fn dashboard(lexis: &Lexis, output: &Output) -> anyhow::Result<()> {
    let Some(user) = lexis.session().current_user() else {
        bail!(lexis::ClientError::Unauthorized(
            "no cached profile".to_string()
        ));
    };

    output.header(&format!("{} dashboard", capitalize(&user.role.to_string())));
    match user.role {
        Role::Individual => individual_dashboard(lexis, output).await,
        Role::Lawyer => lawyer_dashboard(lexis, output).await,
        Role::Admin => {
            let analytics = lexis.dashboards().admin_analytics().await?;
            print_stats(output, &analytics.stats);
            Ok(())
        }
    }
}

async fn individual_dashboard(lexis: &Lexis, output: &Output) -> anyhow::Result<()> {
    let (documents_api, subscriptions_api, lawyers_api) =
        (lexis.documents(), lexis.subscriptions(), lexis.lawyers());
    let (documents, status, lawyer) = tokio::join!(
        documents_api.list(),
        subscriptions_api.status(),
        lawyers_api.my_lawyer(),
    );
    let documents = documents?;

    output.subheader("Subscription");
    print_subscription(output, &status);

    output.subheader("Your lawyer");
    match lawyer? {
        Some(lawyer) => output.kv(&lawyer.username, &lawyer.email),
        None => output.empty("assigned lawyer"),
    }

    output.subheader("Recent documents");
    if documents.is_empty() {
        output.empty("documents");
    } else {
        output.table(
            &["ID", "Title", "Status", "Risk", "Uploaded"],
            &documents
                .iter()
                .take(5)
                .map(|d| {
                    vec![
                        d.id.to_string(),
                        truncate(&d.title, 40),
                        d.status.to_string(),
                        output.risk(d.risk_score.as_deref()),
                        format_date(d.uploaded_at.as_deref()),
                    ]
                })
                .collect::<Vec<_>>(),
        );
    }
    Ok(())
}

async fn lawyer_dashboard(lexis: &Lexis, output: &Output) -> anyhow::Result<()> {
    let (lawyers_api, sharing_api, dashboards_api) =
        (lexis.lawyers(), lexis.sharing(), lexis.dashboards());
    let (clients, shared, analytics) = tokio::join!(
        lawyers_api.clients(),
        sharing_api.shared_by_me(),
        dashboards_api.lawyer_analytics(),
    );

    print_stats(output, &analytics?.stats);

    output.subheader("Clients");
    let clients = clients?;
    if clients.is_empty() {
        output.empty("clients");
    }
    for client in &clients {
        output.list_item(&format!(
            "{} <{}> - {} documents",
            client.username, client.email, client.documents_count
        ));
    }

    output.subheader("Pending shares");
    let pending: Vec<SharedDocument> = shared?
        .into_iter()
        .filter(|s| s.status == lexis::ShareStatus::Pending)
        .collect();
    print_shares(output, &pending);
    Ok(())
}

fn print_stats(output: &Output, stats: &std::collections::BTreeMap<String, serde_json::Value>) {
    output.subheader("Statistics");
    if stats.is_empty() {
        output.empty("statistics");
    }
    for (key, value) in stats {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output.kv(&key.replace('_', " "), &rendered);
    }
}

fn print_subscription(output: &Output, status: &SubscriptionStatus) {
    output.kv("Plan", &status.plan.to_string());
    output.kv("Status", &format!("{:?}", status.status).to_lowercase());
    if let Some(usage) = &status.usage {
        output.kv(
            "Analyses",
            &format!("{} of {} used", usage.analyses_used, usage.analyses_limit),
        );
    }
    if status.current_period_end.is_some() {
        output.kv("Renews", &format_date(status.current_period_end.as_deref()));
    }
    if status.cancel_at_period_end {
        output.warning("Cancels at the end of the current period");
    }
}

pub async fn documents(
    lexis: &Lexis,
    output: &Output,
    command: DocumentCommands,
) -> anyhow::Result<()> {
    let api = lexis.documents();
    match command {
        DocumentCommands::List => {
            let documents = api.list().await?;
            output.header("Documents");
            if documents.is_empty() {
                output.empty("documents");
                return Ok(());
            }
            output.table(
                &["ID", "Title", "Status", "Risk", "Uploaded"],
                &documents
                    .iter()
                    .map(|d| {
                        vec![
                            d.id.to_string(),
                            truncate(&d.title, 40),
                            d.status.to_string(),
                            output.risk(d.risk_score.as_deref()),
                            format_date(d.uploaded_at.as_deref()),
                        ]
                    })
                    .collect::<Vec<_>>(),
            );
        }
        DocumentCommands::Show { id } => {
            let document = api.get(id).await?;
            output.header(&document.title);
            output.kv("ID", &document.id.to_string());
            output.kv("Status", &document.status.to_string());
            output.kv("Risk score", &output.risk(document.risk_score.as_deref()));
            output.kv("Uploaded", &format_date(document.uploaded_at.as_deref()));
            output.kv("Analyzed", &format_date(document.analyzed_at.as_deref()));
            if let Some(text) = document.extracted_text.as_deref() {
                output.subheader("Extract");
                println!("    {}", truncate(text, 400));
            }
        }
        DocumentCommands::Upload {
            file,
            title,
            analyze,
        } => {
            let upload = read_upload(&file, title)?;
            let document = api.upload(upload).await?;
            output.success(&format!("Uploaded \"{}\" as #{}", document.title, document.id));
            if analyze {
                let result = api.analyze(document.id).await?;
                output.success("Analysis complete");
                output.kv("Risk score", &output.risk(result.risk_score.as_deref()));
            } else {
                output.hint(&format!("Run `lexis documents analyze {}` next", document.id));
            }
        }
        DocumentCommands::Analyze { id } => {
            let result = api.analyze(id).await?;
            output.success(&format!("Document #{} analyzed", result.document_id));
            output.kv("Risk score", &output.risk(result.risk_score.as_deref()));
            if let Some(summary) = result.summary.as_deref() {
                output.kv("Summary", summary);
            }
        }
        DocumentCommands::Report { id } => {
            let report = api.report(id).await?;
            let breakdown = report.clause_breakdown();
            output.header(&format!("Report: {}", report.title));
            output.kv("Risk score", &output.risk(report.risk_score.as_deref()));
            output.kv("Analyzed", &format_date(report.analyzed_at.as_deref()));
            output.kv(
                "Clauses",
                &format!(
                    "{} total, {} compliant, {} need review",
                    breakdown.total, breakdown.compliant, breakdown.needs_review
                ),
            );
            if let Some(summary) = report.summary.as_deref() {
                output.subheader("Summary");
                println!("    {}", summary);
            }
            output.subheader("Clauses");
            for (clause, found) in &report.clauses_found {
                if *found {
                    output.success(clause);
                } else {
                    output.warning(&format!("{} (needs review)", clause));
                }
            }
        }
        DocumentCommands::Download { id, output: path } => {
            let bytes = api.download(id).await?;
            let path = path.unwrap_or_else(|| PathBuf::from(format!("document_{}", id)));
            fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!("Saved {} bytes to {}", bytes.len(), path.display()));
        }
    }
    Ok(())
}

fn read_upload(path: &Path, title: Option<String>) -> anyhow::Result<UploadFile> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    Ok(UploadFile {
        mime: guess_mime(&file_name).map(str::to_string),
        file_name,
        bytes,
        title,
    })
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_string_lossy()
        .to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

pub async fn comments(
    lexis: &Lexis,
    output: &Output,
    command: CommentCommands,
) -> anyhow::Result<()> {
    let api = lexis.collaboration();
    match command {
        CommentCommands::List { document } => {
            let comments = api.comments(document).await?;
            output.header(&format!("Comments on #{}", document));
            if comments.is_empty() {
                output.empty("comments");
            }
            for comment in comments {
                output.list_item(&format!(
                    "[{}] {} ({}): {}",
                    comment.id,
                    comment.user.username,
                    format_date(Some(&comment.created_at)),
                    comment.text
                ));
            }
        }
        CommentCommands::Add { document, text } => {
            if text.trim().is_empty() {
                bail!("Comment text must not be empty");
            }
            let comment = api.add_comment(document, text.trim()).await?;
            output.success(&format!("Added comment #{}", comment.id));
        }
        CommentCommands::Delete { id } => {
            api.delete_comment(id).await?;
            output.success(&format!("Deleted comment #{}", id));
        }
    }
    Ok(())
}

pub async fn versions(
    lexis: &Lexis,
    output: &Output,
    command: VersionCommands,
) -> anyhow::Result<()> {
    let api = lexis.collaboration();
    match command {
        VersionCommands::List { document } => {
            let versions = api.versions(document).await?;
            output.header(&format!("Versions of #{}", document));
            if versions.is_empty() {
                output.empty("versions");
                return Ok(());
            }
            output.table(
                &["ID", "Version", "Created", "Changes"],
                &versions
                    .iter()
                    .map(|v| {
                        vec![
                            v.id.to_string(),
                            format!("v{}", v.version_number),
                            format_date(Some(&v.created_at)),
                            truncate(v.changes_summary.as_deref().unwrap_or("-"), 50),
                        ]
                    })
                    .collect::<Vec<_>>(),
            );
        }
        VersionCommands::Show { id } => {
            let version = api.version(id).await?;
            output.header(&format!("Version {}", version.version_number));
            output.kv("Document", &version.document_id.to_string());
            output.kv("Created", &format_date(Some(&version.created_at)));
            if let Some(changes) = version.changes_summary.as_deref() {
                output.kv("Changes", changes);
            }
            if let Some(content) = version.content.as_deref() {
                output.subheader("Content");
                println!("{}", content);
            }
        }
    }
    Ok(())
}

pub async fn notifications(
    lexis: &Lexis,
    output: &Output,
    command: NotificationCommands,
) -> anyhow::Result<()> {
    let api = lexis.notifications();
    match command {
        NotificationCommands::List { unread } => {
            let notifications: Vec<_> = api
                .list()
                .await?
                .into_iter()
                .filter(|n| !unread || !n.is_read)
                .collect();
            output.header("Notifications");
            if notifications.is_empty() {
                output.empty("notifications");
            }
            for n in notifications {
                let marker = if n.is_read { " " } else { "*" };
                output.list_item(&format!(
                    "{} [{}] {} ({})",
                    marker,
                    n.id,
                    n.message,
                    format_date(n.created_at.as_deref())
                ));
            }
        }
        NotificationCommands::Read { id } => {
            api.mark_read(id).await?;
            output.success(&format!("Marked notification #{} as read", id));
        }
        NotificationCommands::ReadAll => {
            let ack = api.mark_all_read().await?;
            output.success(
                ack.message
                    .as_deref()
                    .unwrap_or("All notifications marked as read"),
            );
        }
        NotificationCommands::Delete { id } => {
            api.delete(id).await?;
            output.success(&format!("Deleted notification #{}", id));
        }
    }
    Ok(())
}

pub async fn activity(lexis: &Lexis, output: &Output, kind: Option<String>) -> anyhow::Result<()> {
    let api = lexis.activity();
    let entries = match kind.as_deref() {
        Some(kind) => api.filter(kind).await?,
        None => api.list().await?,
    };

    output.header("Activity");
    if entries.is_empty() {
        output.empty("activity");
        return Ok(());
    }
    output.table(
        &["When", "Type", "Action"],
        &entries
            .iter()
            .map(|e| {
                vec![
                    format_date(Some(&e.timestamp)),
                    e.kind.as_str().to_string(),
                    truncate(&e.action, 60),
                ]
            })
            .collect::<Vec<_>>(),
    );
    Ok(())
}

pub async fn share(lexis: &Lexis, output: &Output, command: ShareCommands) -> anyhow::Result<()> {
    let api = lexis.sharing();
    match command {
        ShareCommands::Create { document, client } => {
            let share = api.share(document, client).await?;
            output.success(&format!(
                "Shared \"{}\" with {} (pending)",
                share.document_title, share.client_name
            ));
        }
        ShareCommands::Accept { id } => {
            let share = api.accept(id).await?;
            output.success(&format!("Accepted \"{}\"", share.document_title));
        }
        ShareCommands::Decline { id } => {
            let share = api.decline(id).await?;
            output.success(&format!("Declined \"{}\"", share.document_title));
        }
        ShareCommands::List { sent } => {
            let shares = if sent {
                api.shared_by_me().await?
            } else {
                api.shared_with_me().await?
            };
            output.header(if sent {
                "Shared by you"
            } else {
                "Shared with you"
            });
            print_shares(output, &shares);
        }
    }
    Ok(())
}

fn print_shares(output: &Output, shares: &[SharedDocument]) {
    if shares.is_empty() {
        output.empty("shared documents");
        return;
    }
    output.table(
        &["ID", "Document", "Lawyer", "Client", "Status"],
        &shares
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    truncate(&s.document_title, 40),
                    s.lawyer_name.clone(),
                    s.client_name.clone(),
                    format!("{:?}", s.status).to_lowercase(),
                ]
            })
            .collect::<Vec<_>>(),
    );
}

pub async fn clients(lexis: &Lexis, output: &Output, command: ClientCommands) -> anyhow::Result<()> {
    let api = lexis.lawyers();
    match command {
        ClientCommands::Assign { email } => {
            let request = api.assign_client(&email).await?;
            output.success(&format!(
                "Sent assignment request #{} to {}",
                request.id, request.client.email
            ));
        }
        ClientCommands::List => {
            let clients = api.clients().await?;
            output.header("Clients");
            if clients.is_empty() {
                output.empty("clients");
                return Ok(());
            }
            output.table(
                &["ID", "Name", "Email", "Since", "Documents"],
                &clients
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.username.clone(),
                            c.email.clone(),
                            format_date(Some(&c.assigned_date)),
                            c.documents_count.to_string(),
                        ]
                    })
                    .collect::<Vec<_>>(),
            );
        }
        ClientCommands::Respond { id, action } => {
            let action = AssignmentAction::from(action);
            let ack = api.respond(id, action).await?;
            let fallback = match action {
                AssignmentAction::Accept => "Assignment accepted",
                AssignmentAction::Reject => "Assignment rejected",
            };
            output.success(ack.message.as_deref().unwrap_or(fallback));
        }
        ClientCommands::Requests { sent } => {
            let requests = if sent {
                api.sent_requests().await?
            } else {
                api.pending_requests().await?
            };
            output.header("Assignment requests");
            if requests.is_empty() {
                output.empty("requests");
                return Ok(());
            }
            output.table(
                &["ID", "Lawyer", "Client", "Status", "Created"],
                &requests
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            r.lawyer.username.clone(),
                            r.client.username.clone(),
                            format!("{:?}", r.status).to_lowercase(),
                            format_date(Some(&r.created_at)),
                        ]
                    })
                    .collect::<Vec<_>>(),
            );
        }
        ClientCommands::Search { query } => {
            let users = api.search(&query).await?;
            output.header(&format!("Users matching \"{}\"", query));
            if users.is_empty() {
                output.empty("users");
            }
            for user in users {
                output.list_item(&format!("[{}] {} <{}>", user.id, user.username, user.email));
            }
        }
    }
    Ok(())
}

pub async fn subscription(
    lexis: &Lexis,
    output: &Output,
    command: SubscriptionCommands,
) -> anyhow::Result<()> {
    let api = lexis.subscriptions();
    match command {
        SubscriptionCommands::Status => {
            let status = api.status().await;
            output.header("Subscription");
            print_subscription(output, &status);
            if !status.is_premium() {
                output.hint("Upgrade with `lexis subscription checkout premium`");
            }
        }
        SubscriptionCommands::Checkout { plan } => {
            let plan = Plan::from(plan);
            let session = api.create_checkout(plan).await?;
            output.success(&format!("Checkout for the {} plan is ready", plan));
            output.kv("Open", &session.checkout_url);
        }
        SubscriptionCommands::Portal => {
            let portal = api.billing_portal().await?;
            output.kv("Billing portal", &portal.portal_url);
        }
    }
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    print!("  Password: ");
    io::stdout().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("nda.PDF"), Some("application/pdf"));
        assert_eq!(guess_mime("notes.txt"), Some("text/plain"));
        assert_eq!(guess_mime("archive.zip"), None);
        assert_eq!(guess_mime("README"), None);
    }

    #[test]
    fn test_read_upload_uses_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lease.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();

        let upload = read_upload(&path, Some("Office lease".to_string())).unwrap();
        assert_eq!(upload.file_name, "lease.pdf");
        assert_eq!(upload.mime.as_deref(), Some("application/pdf"));
        assert_eq!(upload.bytes, b"%PDF-1.4");
        assert_eq!(upload.title.as_deref(), Some("Office lease"));
    }

    #[test]
    fn test_read_upload_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_upload(&dir.path().join("missing.pdf"), None).is_err());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("lawyer"), "Lawyer");
        assert_eq!(capitalize(""), "");
    }
}
