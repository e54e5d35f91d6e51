use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy exposed by the tracker module.
///
/// Authentication failures are not represented here; they belong to the API
/// layer, which rejects requests before the domain is reached.
#[derive(Error, Debug, Clone)]
pub enum TrackerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Integrity violation: {message}")]
    Integrity { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TrackerError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
