use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::contract::error::TrackerError;

/// REST-facing error with a structured JSON body.
///
/// Validation failures carry the offending field so clients get DRF-style
/// `{"errors": {field: [message]}}` payloads; everything else is a plain
/// `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Validation { field: String, message: String },
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::Validation { field, message } => {
                let mut field_errors = serde_json::Map::new();
                field_errors.insert(field, serde_json::json!([message]));
                (
                    StatusCode::BAD_REQUEST,
                    serde_json::json!({ "errors": field_errors }),
                )
            }
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                serde_json::json!({ "error": msg }),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            TrackerError::Validation { field, message } => ApiError::Validation { field, message },
            TrackerError::Conflict { message } => ApiError::Conflict(message),
            TrackerError::Integrity { message } | TrackerError::Internal { message } => {
                ApiError::Internal(message)
            }
        }
    }
}
