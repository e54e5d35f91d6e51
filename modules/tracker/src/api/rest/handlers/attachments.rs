//! Attachment resource handlers.
//!
//! Creation is multipart (`task` + `file` fields); the bytes go to the blob
//! store and only the opaque key is persisted. Download streams the bytes
//! back from the store.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use blobstore::BlobStore;
use tracing::warn;
use uuid::Uuid;

use crate::api::rest::dto::{AttachmentPatchInput, AttachmentView};
use crate::api::rest::error::ApiError;
use crate::api::state::AppState;

/// GET /api/attachments
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AttachmentView>>, ApiError> {
    let attachments = state.service.list_attachments().await?;
    Ok(Json(attachments.into_iter().map(Into::into).collect()))
}

/// POST /api/attachments (multipart/form-data)
pub async fn create(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AttachmentView>), ApiError> {
    let mut task_id: Option<Uuid> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("task") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable task field: {e}")))?;
                task_id = Some(raw.parse().map_err(|_| ApiError::Validation {
                    field: "task".to_string(),
                    message: "not a valid task id".to_string(),
                })?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable file field: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let task_id = task_id.ok_or_else(|| ApiError::Validation {
        field: "task".to_string(),
        message: "missing required field".to_string(),
    })?;
    let (filename, bytes) = file.ok_or_else(|| ApiError::Validation {
        field: "file".to_string(),
        message: "missing required field".to_string(),
    })?;

    let key = state
        .blobs
        .put(&filename, &bytes)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match state.service.create_attachment(task_id, key.clone()).await {
        Ok(attachment) => Ok((StatusCode::CREATED, Json(attachment.into()))),
        Err(e) => {
            // The record never landed; drop the orphaned blob.
            if let Err(cleanup) = state.blobs.delete(&key).await {
                warn!("failed to clean up orphaned blob {key}: {cleanup}");
            }
            Err(e.into())
        }
    }
}

/// GET /api/attachments/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AttachmentView>, ApiError> {
    let attachment = state.service.get_attachment(id).await?;
    Ok(Json(attachment.into()))
}

/// PUT /api/attachments/{id} — the only mutable field is the task binding,
/// so full update and partial update coincide.
pub async fn put(
    state: State<Arc<AppState>>,
    id: Path<Uuid>,
    input: Json<AttachmentPatchInput>,
) -> Result<Json<AttachmentView>, ApiError> {
    patch(state, id, input).await
}

/// PATCH /api/attachments/{id} — re-point at another task.
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<AttachmentPatchInput>,
) -> Result<Json<AttachmentView>, ApiError> {
    let attachment = state.service.update_attachment(id, input.task).await?;
    Ok(Json(attachment.into()))
}

/// DELETE /api/attachments/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let attachment = state.service.delete_attachment(id).await?;
    // Best-effort blob cleanup; the record is already gone.
    if let Err(e) = state.blobs.delete(&attachment.file_ref).await {
        warn!("failed to delete blob {}: {e}", attachment.file_ref);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/attachments/{id}/download
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let attachment = state.service.get_attachment(id).await?;
    let bytes = state
        .blobs
        .get(&attachment.file_ref)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment.file_ref),
        ),
    ];
    Ok((headers, bytes))
}
