//! Task resource handlers, including the aggregate reporting sub-actions.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::rest::dto::{
    AverageView, ByStatusQuery, ByUserQuery, CommentView, RecentQuery, StatusSummaryEntry,
    TaskInput, TaskPatchInput, TaskView,
};
use crate::api::rest::error::ApiError;
use crate::api::state::AppState;
use crate::contract::model::TaskStatus;

const DEFAULT_RECENT_LIMIT: u64 = 5;

/// GET /api/tasks
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TaskView>>, ApiError> {
    let details = state.service.list_task_details().await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TaskInput>,
) -> Result<(StatusCode, Json<TaskView>), ApiError> {
    let details = state.service.create_task(input.into()).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /api/tasks/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskView>, ApiError> {
    let details = state.service.task_details(id).await?;
    Ok(Json(details.into()))
}

/// PUT /api/tasks/{id}
pub async fn put(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<TaskInput>,
) -> Result<Json<TaskView>, ApiError> {
    let details = state.service.update_task(id, input.into()).await?;
    Ok(Json(details.into()))
}

/// PATCH /api/tasks/{id}
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<TaskPatchInput>,
) -> Result<Json<TaskView>, ApiError> {
    let details = state.service.update_task(id, input.into()).await?;
    Ok(Json(details.into()))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tasks/recent?limit=
pub async fn recent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let details = state.service.recent_tasks(limit).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/tasks/by-status?status=
///
/// Omitting `status` returns all tasks; an unknown value is a validation
/// error rather than a silent empty list.
pub async fn by_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ByStatusQuery>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<TaskStatus>().map_err(|()| {
            ApiError::Validation {
                field: "status".to_string(),
                message: format!("unknown status '{raw}'"),
            }
        })?),
    };

    let details = state.service.tasks_by_status(status).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/tasks/by-user?user_id=
///
/// Omitting `user_id` yields an empty list by design.
pub async fn by_user(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ByUserQuery>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    let details = state.service.tasks_by_user(query.user_id).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/tasks/status-summary
pub async fn status_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StatusSummaryEntry>>, ApiError> {
    let summary = state.service.task_status_summary().await?;
    Ok(Json(summary.into_iter().map(Into::into).collect()))
}

/// GET /api/tasks/average-per-project
pub async fn average_per_project(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AverageView>, ApiError> {
    let avg = state.service.average_tasks_per_project().await?;
    Ok(Json(AverageView { avg }))
}

/// GET /api/tasks/{task_id}/comments
pub async fn task_comments(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    let comments = state.service.task_comments(task_id).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}
