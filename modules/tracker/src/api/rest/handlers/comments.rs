//! Comment resource handlers.

use std::sync::Arc;

use authn::CurrentUser;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::rest::dto::{CommentInput, CommentUpdateInput, CommentView, RecentQuery};
use crate::api::rest::error::ApiError;
use crate::api::state::AppState;

const DEFAULT_RECENT_LIMIT: u64 = 5;

/// GET /api/comments
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CommentView>>, ApiError> {
    let details = state.service.list_comment_details().await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// POST /api/comments — the author is the acting identity.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<CommentInput>,
) -> Result<(StatusCode, Json<CommentView>), ApiError> {
    let details = state.service.create_comment(user.id, input.into()).await?;
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /api/comments/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommentView>, ApiError> {
    let details = state.service.comment_details(id).await?;
    Ok(Json(details.into()))
}

/// PUT /api/comments/{id} — content only; the author never changes.
pub async fn put(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<CommentUpdateInput>,
) -> Result<Json<CommentView>, ApiError> {
    let details = state.service.update_comment(id, input.content).await?;
    Ok(Json(details.into()))
}

/// PATCH /api/comments/{id}
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<CommentUpdateInput>,
) -> Result<Json<CommentView>, ApiError> {
    let details = state.service.update_comment(id, input.content).await?;
    Ok(Json(details.into()))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/comments/recent?limit=
pub async fn recent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let details = state.service.recent_comments(limit).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}
