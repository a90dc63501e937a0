//! End-to-end tests against the in-memory backend.

use futures::future::join_all;
use lexis::http::Transport;
use lexis::session::{FileStore, Session};
use lexis::{
    ActivityKind, ApiClient, AssignmentAction, ClientError, Credentials, DocumentStatus, Lexis,
    Plan, Role, UploadFile,
};
use lexis_mock::{MockOptions, MockServerHandle};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ============= Helper Functions =============

async fn start_server() -> MockServerHandle {
    lexis_mock::spawn_local_server()
        .await
        .expect("Failed to start mock backend")
}

fn lexis_with(server: &MockServerHandle, session: Session) -> Lexis {
    let transport = Transport::new(&server.base_url(), Duration::from_secs(5), "lexis-test").unwrap();
    Lexis::new(ApiClient::new(transport, session))
}

async fn signed_in(server: &MockServerHandle, email: &str, password: &str) -> Lexis {
    let lexis = lexis_with(server, Session::in_memory());
    lexis
        .auth()
        .login(&Credentials {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .unwrap();
    lexis
}

async fn client(server: &MockServerHandle) -> Lexis {
    signed_in(server, "client@lexis.dev", "client123").await
}

// ============= Auth & Session =============

#[tokio::test]
async fn test_login_stores_session() {
    let server = start_server().await;
    let lexis = client(&server).await;

    assert!(lexis.session().is_authenticated());
    assert!(lexis.session().refresh_token().is_some());
    assert_eq!(lexis.session().role(), Some(Role::Individual));
    assert_eq!(lexis.session().dashboard_route(None), "/individual-dashboard");

    let profile = lexis.auth().profile().await.unwrap();
    assert_eq!(profile.email, "client@lexis.dev");
}

#[tokio::test]
async fn test_wrong_password_is_not_refreshed() {
    let server = start_server().await;
    let lexis = lexis_with(&server, Session::in_memory());

    let err = lexis
        .auth()
        .login(&Credentials {
            email: "client@lexis.dev".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(server.store().refresh_calls(), 0);
    assert!(!lexis.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = start_server().await;
    let lexis = client(&server).await;

    lexis.auth().logout().unwrap();
    assert!(!lexis.session().is_authenticated());
    assert!(lexis.session().current_user().is_none());

    let err = lexis.documents().list().await.unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_file_session_survives_restart() {
    let server = start_server().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".lexis").join("credentials.json");

    {
        let store = FileStore::open(&path).unwrap();
        let lexis = lexis_with(&server, Session::new(Arc::new(store)));
        lexis
            .auth()
            .login(&Credentials {
                email: "lawyer@lexis.dev".to_string(),
                password: "lawyer123".to_string(),
            })
            .await
            .unwrap();
    }
    assert!(path.exists());

    let store = FileStore::open(&path).unwrap();
    let lexis = lexis_with(&server, Session::new(Arc::new(store)));
    assert_eq!(lexis.session().role(), Some(Role::Lawyer));
    let clients = lexis.lawyers().clients().await.unwrap();
    assert_eq!(clients.len(), 1);
}

// ============= Transparent Refresh =============

#[tokio::test]
async fn test_expired_access_token_is_refreshed_transparently() {
    let server = start_server().await;
    let lexis = client(&server).await;
    let before = lexis.session().access_token().unwrap();

    server.store().expire_access_tokens();
    let documents = lexis.documents().list().await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(server.store().refresh_calls(), 1);
    assert_ne!(lexis.session().access_token().unwrap(), before);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_refresh() {
    let server = lexis_mock::spawn_with(MockOptions {
        refresh_delay: Duration::from_millis(200),
        ..Default::default()
    })
    .await
    .unwrap();
    let lexis = client(&server).await;

    server.store().expire_access_tokens();

    let documents = lexis.documents();
    let notifications = lexis.notifications();
    let activity = lexis.activity();
    let lawyers = lexis.lawyers();
    let (a, b, c, d) = tokio::join!(
        documents.list(),
        activity.list(),
        notifications.list(),
        lawyers.my_lawyer(),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok() && d.is_ok());
    assert_eq!(server.store().refresh_calls(), 1);
    assert_eq!(lexis.client().coordinator().attempts(), 1);
}

#[tokio::test]
async fn test_many_concurrent_requests_share_one_refresh() {
    let server = lexis_mock::spawn_with(MockOptions {
        refresh_delay: Duration::from_millis(200),
        ..Default::default()
    })
    .await
    .unwrap();
    let lexis = client(&server).await;
    server.store().expire_access_tokens();

    let api = lexis.documents();
    let results = join_all((0..8).map(|_| api.list())).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(server.store().refresh_calls(), 1);
}

#[tokio::test]
async fn test_revoked_refresh_token_ends_session() {
    let server = start_server().await;
    let lexis = client(&server).await;

    server.store().expire_access_tokens();
    server.store().revoke_refresh_tokens();

    let err = lexis.documents().list().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::RefreshFailed {
            status: Some(401),
            ..
        }
    ));
    assert!(!lexis.session().is_authenticated());
    assert!(lexis.session().refresh_token().is_none());
}

#[tokio::test]
async fn test_explicit_refresh_token_call() {
    let server = start_server().await;
    let lexis = client(&server).await;
    let refresh = lexis.session().refresh_token().unwrap();

    let refreshed = lexis.auth().refresh_token(&refresh).await.unwrap();
    assert_eq!(lexis.session().access_token(), Some(refreshed.access));
    // The mock does not rotate refresh tokens
    assert_eq!(lexis.session().refresh_token(), Some(refresh));
}

// ============= Documents =============

#[tokio::test]
async fn test_upload_analyze_report_download() {
    let server = start_server().await;
    let lexis = client(&server).await;
    let text = "Confidential. Termination on notice. Liability capped. Payment in 30 days.";

    let document = lexis
        .documents()
        .upload(UploadFile {
            file_name: "services.txt".to_string(),
            bytes: text.as_bytes().to_vec(),
            mime: Some("text/plain".to_string()),
            title: Some("Services Agreement".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(document.title, "Services Agreement");
    assert_eq!(document.status, DocumentStatus::Pending);

    let analysis = lexis.documents().analyze(document.id).await.unwrap();
    assert_eq!(analysis.risk_score.as_deref(), Some("33.3"));

    let report = lexis.documents().report(document.id).await.unwrap();
    assert_eq!(report.title, "Services Agreement");
    let breakdown = report.clause_breakdown();
    assert_eq!(breakdown.total, 6);
    assert_eq!(breakdown.compliant, 4);

    let bytes = lexis.documents().download(document.id).await.unwrap();
    assert_eq!(bytes, text.as_bytes());

    let versions = lexis.collaboration().versions(document.id).await.unwrap();
    assert_eq!(versions.len(), 1);
}

#[tokio::test]
async fn test_free_plan_limit_is_plain_http_error() {
    let server = start_server().await;
    let lexis = client(&server).await;
    let documents = lexis.documents().list().await.unwrap();
    let id = documents[0].id;

    lexis.documents().analyze(id).await.unwrap();
    lexis.documents().analyze(id).await.unwrap();
    let err = lexis.documents().analyze(id).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(!err.is_auth_failure());
    assert!(lexis.session().is_authenticated());

    lexis.subscriptions().create_checkout(Plan::Premium).await.unwrap();
    let status = lexis.subscriptions().status().await;
    assert!(status.is_premium());
    lexis.documents().analyze(id).await.unwrap();
}

// ============= Collaboration & Sharing =============

#[tokio::test]
async fn test_comments_roundtrip() {
    let server = start_server().await;
    let lexis = client(&server).await;
    let id = lexis.documents().list().await.unwrap()[0].id;

    let comment = lexis
        .collaboration()
        .add_comment(id, "Is clause 7 negotiable?")
        .await
        .unwrap();
    assert_eq!(comment.user.username, "ana");

    let comments = lexis.collaboration().comments(id).await.unwrap();
    assert_eq!(comments.len(), 1);

    lexis.collaboration().delete_comment(comment.id).await.unwrap();
    assert!(lexis.collaboration().comments(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_share_and_accept() {
    let server = start_server().await;
    let lawyer = signed_in(&server, "lawyer@lexis.dev", "lawyer123").await;
    let client = client(&server).await;

    let sent = lawyer.sharing().shared_by_me().await.unwrap();
    assert_eq!(sent.len(), 1);

    let incoming = client.sharing().shared_with_me().await.unwrap();
    let accepted = client.sharing().accept(incoming[0].id).await.unwrap();
    assert_eq!(accepted.document_id, sent[0].document_id);

    let document = client.documents().get(accepted.document_id).await.unwrap();
    assert_eq!(document.title, "Mutual NDA Template");
}

#[tokio::test]
async fn test_assignment_request_flow() {
    let server = start_server().await;
    let lawyer = signed_in(&server, "lawyer@lexis.dev", "lawyer123").await;

    let newcomer = lexis_with(&server, Session::in_memory());
    newcomer
        .auth()
        .register(&lexis::RegisterRequest {
            username: "carla".to_string(),
            email: "carla@example.com".to_string(),
            password: "secret99".to_string(),
            role: Role::Individual,
        })
        .await
        .unwrap();
    assert!(newcomer.lawyers().my_lawyer().await.unwrap().is_none());

    let request = lawyer
        .lawyers()
        .assign_client("carla@example.com")
        .await
        .unwrap();
    let pending = newcomer.lawyers().pending_requests().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, request.id);

    newcomer
        .lawyers()
        .respond(request.id, AssignmentAction::Accept)
        .await
        .unwrap();
    let assigned = newcomer.lawyers().my_lawyer().await.unwrap().unwrap();
    assert_eq!(assigned.username, "jmartinez");
    assert_eq!(lawyer.lawyers().clients().await.unwrap().len(), 2);
}

// ============= Notifications, Activity, Dashboards =============

#[tokio::test]
async fn test_notifications_and_activity() {
    let server = start_server().await;
    let lexis = client(&server).await;

    let notifications = lexis.notifications().list().await.unwrap();
    assert_eq!(notifications.iter().filter(|n| !n.is_read).count(), 2);

    lexis.notifications().mark_all_read().await.unwrap();
    let notifications = lexis.notifications().list().await.unwrap();
    assert!(notifications.iter().all(|n| n.is_read));

    let uploads = lexis.activity().filter("upload").await.unwrap();
    assert!(!uploads.is_empty());
    assert!(uploads.iter().all(|e| e.kind == ActivityKind::Upload));
}

#[tokio::test]
async fn test_role_gated_analytics() {
    let server = start_server().await;
    let admin = signed_in(&server, "admin@lexis.dev", "admin123").await;
    let client = client(&server).await;

    let analytics = admin.dashboards().admin_analytics().await.unwrap();
    assert_eq!(analytics.stats["total_users"], 3);
    assert!(analytics.extra.contains_key("recent_documents"));

    let err = client.dashboards().admin_analytics().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_subscription_status_falls_back_when_signed_out() {
    let server = start_server().await;
    let lexis = lexis_with(&server, Session::in_memory());

    let status = lexis.subscriptions().status().await;
    assert_eq!(status.plan, Plan::Free);
    assert!(!status.is_premium());
}

// ============= Classification =============

#[rstest]
#[case("Uploaded document Lease", ActivityKind::Upload)]
#[case("Analyzed document Lease", ActivityKind::Analysis)]
#[case("Viewed report for Lease", ActivityKind::Report)]
#[case("Downloaded document Lease", ActivityKind::Download)]
#[case("User login", ActivityKind::Auth)]
#[case("Subscription settings changed", ActivityKind::Settings)]
#[case("Something else", ActivityKind::Other)]
fn test_activity_kind_detection(#[case] action: &str, #[case] expected: ActivityKind) {
    assert_eq!(ActivityKind::detect(action), expected);
}
