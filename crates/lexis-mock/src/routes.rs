use crate::auth::auth_middleware;
use crate::handlers::{
    analytics, auth, collaboration, documents, notifications, sharing, subscriptions, users,
};
use crate::store::MockStore;
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Full mock API, mounted under `/api`.
pub fn router(store: Arc<MockStore>) -> Router {
    let public_routes = Router::new()
        .route("/auth/register/", post(auth::register))
        .route("/auth/login/", post(auth::login))
        .route("/auth/token/refresh/", post(auth::refresh_token));

    let protected_routes = Router::new()
        .route("/auth/profile/", get(auth::profile))
        // Documents
        .route("/documents/", get(documents::list))
        .route("/documents/upload/", post(documents::upload))
        .route("/documents/{id}/", get(documents::get))
        .route("/documents/{id}/analyze/", post(documents::analyze))
        .route("/documents/{id}/report/", get(documents::report))
        .route("/documents/{id}/download/", get(documents::download))
        // Comments and versions
        .route(
            "/documents/{id}/comments/",
            get(collaboration::list_comments).post(collaboration::add_comment),
        )
        .route(
            "/documents/comments/{id}/",
            delete(collaboration::delete_comment),
        )
        .route("/documents/{id}/versions/", get(collaboration::list_versions))
        .route("/documents/versions/{id}/", get(collaboration::get_version))
        // Sharing
        .route("/documents/share/", post(sharing::share))
        .route("/documents/share/{id}/accept/", post(sharing::accept))
        .route("/documents/share/{id}/decline/", post(sharing::decline))
        .route("/documents/shared/by-me/", get(sharing::shared_by_me))
        .route("/documents/shared/with-me/", get(sharing::shared_with_me))
        // Analytics
        .route("/documents/admin/analytics/", get(analytics::admin))
        .route("/documents/lawyer/analytics/", get(analytics::lawyer))
        // Lawyer / client assignments
        .route("/users/lawyers/assign-client/", post(users::assign_client))
        .route("/users/lawyers/clients/", get(users::lawyer_clients))
        .route(
            "/users/lawyers/assignment-requests/",
            get(users::lawyer_requests),
        )
        .route("/users/clients/lawyer/", get(users::client_lawyer))
        .route(
            "/users/clients/assignment-requests/",
            get(users::client_requests),
        )
        .route("/users/clients/assignment/respond/", post(users::respond))
        .route("/users/search/", get(users::search))
        // Notifications and activity
        .route("/notifications/", get(notifications::list))
        .route("/notifications/mark-all/", patch(notifications::mark_all_read))
        .route("/notifications/logs/", get(notifications::logs))
        .route("/notifications/{id}/read/", patch(notifications::mark_read))
        .route("/notifications/{id}/delete/", delete(notifications::delete))
        // Subscriptions
        .route(
            "/subscriptions/create-checkout/",
            post(subscriptions::create_checkout),
        )
        .route("/subscriptions/status/", get(subscriptions::status))
        .route("/subscriptions/portal/", post(subscriptions::portal))
        .route_layer(middleware::from_fn_with_state(
            store.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
