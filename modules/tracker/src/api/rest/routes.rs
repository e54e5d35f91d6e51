//! Router assembly for both projections.
//!
//! Registration, token issuance and the health probe are public; everything
//! else, including `/graphql`, sits behind the Bearer-token middleware.

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::graphql;
use crate::api::rest::handlers::{
    self, attachments, auth, comments, profile, projects, tasks,
};
use crate::api::rest::middleware::require_auth;
use crate::api::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/register", post(auth::register))
        .route("/api/token", post(auth::token))
        .route("/api/token/refresh", post(auth::token_refresh));

    let protected = Router::new()
        // Projects
        .route(
            "/api/projects",
            get(projects::list).post(projects::create),
        )
        .route(
            "/api/projects/with-task-count",
            get(projects::with_task_count),
        )
        .route(
            "/api/projects/with-comment-count",
            get(projects::with_comment_count),
        )
        .route("/api/projects/active", get(projects::active))
        .route("/api/projects/unactive", get(projects::unactive))
        .route(
            "/api/projects/{id}",
            get(projects::get)
                .put(projects::put)
                .patch(projects::patch)
                .delete(projects::delete),
        )
        // Tasks
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/recent", get(tasks::recent))
        .route("/api/tasks/by-status", get(tasks::by_status))
        .route("/api/tasks/by-user", get(tasks::by_user))
        .route("/api/tasks/status-summary", get(tasks::status_summary))
        .route(
            "/api/tasks/average-per-project",
            get(tasks::average_per_project),
        )
        .route(
            "/api/tasks/{id}",
            get(tasks::get)
                .put(tasks::put)
                .patch(tasks::patch)
                .delete(tasks::delete),
        )
        .route("/api/tasks/{id}/comments", get(tasks::task_comments))
        // Comments
        .route("/api/comments", get(comments::list).post(comments::create))
        .route("/api/comments/recent", get(comments::recent))
        .route(
            "/api/comments/{id}",
            get(comments::get)
                .put(comments::put)
                .patch(comments::patch)
                .delete(comments::delete),
        )
        // Attachments
        .route(
            "/api/attachments",
            get(attachments::list).post(attachments::create),
        )
        .route(
            "/api/attachments/{id}",
            get(attachments::get)
                .put(attachments::put)
                .patch(attachments::patch)
                .delete(attachments::delete),
        )
        .route(
            "/api/attachments/{id}/download",
            get(attachments::download),
        )
        // Profile of the acting user
        .route("/api/profile", get(profile::get).put(profile::put))
        // GraphQL projection
        .route("/graphql", post(graphql::graphql_handler))
        .layer(from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
