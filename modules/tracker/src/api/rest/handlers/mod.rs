pub mod attachments;
pub mod auth;
pub mod comments;
pub mod profile;
pub mod projects;
pub mod tasks;

use axum::Json;

/// Liveness probe; deliberately outside the auth boundary.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
