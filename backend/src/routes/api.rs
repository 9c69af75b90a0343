use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use crate::core;
use crate::services::storage::StorageError;

/// Shared error type for the owner/tenant/notification API routes.
/// Every failure is scoped to the triggering request; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid status transition from '{from}' to '{to}'")]
    InvalidStatusTransition { from: &'static str, to: &'static str },

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Database error: {0}")]
    Database(core::DbError),
}

impl From<core::DbError> for ApiError {
    fn from(error: core::DbError) -> Self {
        match error {
            core::DbError::RowNotFound => Self::NotFound("Resource"),
            e => Self::Database(e),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::UnknownBucket(bucket) => Self::Upload(format!("Unknown bucket: {bucket}")),
            StorageError::TooLarge(limit) => Self::Upload(format!("File size must be less than {limit} bytes")),
            e => Self::Storage(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(
            error_type = %std::any::type_name::<Self>(),
            error_subtype = %std::any::type_name_of_val(&self),
            error_message = %self);

        let (status, error_message) = match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            Self::InvalidStatusTransition { .. } => (StatusCode::CONFLICT, self.to_string()),
            Self::Upload(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "result": "error",
            "message": error_message
        }));

        (status, body).into_response()
    }
}
