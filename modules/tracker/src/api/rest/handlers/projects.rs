//! Project resource handlers.

use std::sync::Arc;

use authn::CurrentUser;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::rest::dto::{
    ProjectCommentCountView, ProjectInput, ProjectPatchInput, ProjectTaskCountView, ProjectView,
};
use crate::api::rest::error::ApiError;
use crate::api::state::AppState;

/// GET /api/projects
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let details = state.service.list_project_details(None).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/projects/active
pub async fn active(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let details = state.service.list_project_details(Some(true)).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/projects/unactive
pub async fn unactive(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let details = state.service.list_project_details(Some(false)).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// POST /api/projects — owner is the acting identity, never the payload.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<ProjectView>), ApiError> {
    let details = state.service.create_project(user.id, input.into()).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /api/projects/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectView>, ApiError> {
    let details = state.service.project_details(id).await?;
    Ok(Json(details.into()))
}

/// PUT /api/projects/{id}
pub async fn put(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<ProjectView>, ApiError> {
    let details = state.service.update_project(id, input.into()).await?;
    Ok(Json(details.into()))
}

/// PATCH /api/projects/{id}
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectPatchInput>,
) -> Result<Json<ProjectView>, ApiError> {
    let details = state.service.update_project(id, input.into()).await?;
    Ok(Json(details.into()))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.service.delete_project(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Project not found: {id}")))
    }
}

/// GET /api/projects/with-task-count
pub async fn with_task_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectTaskCountView>>, ApiError> {
    let counts = state.service.projects_with_task_count().await?;
    Ok(Json(counts.into_iter().map(Into::into).collect()))
}

/// GET /api/projects/with-comment-count
pub async fn with_comment_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectCommentCountView>>, ApiError> {
    let counts = state.service.projects_with_comment_count().await?;
    Ok(Json(counts.into_iter().map(Into::into).collect()))
}
