//! Error types for the studio-booking service.
//!
//! Storage failures are kept apart from request-level errors: a
//! [`StorageError`] is recovered by falling back to memory and only turns into
//! an [`AppError`] when the fallback itself fails.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite query or statement errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool errors, including checkout timeouts
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A blocking storage task panicked or was cancelled
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The store did not answer within the configured timeout
    #[error("Storage connection timed out")]
    Timeout,

    /// File I/O errors (creating the database directory)
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be mapped back to a record
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Convenience type alias for storage results
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or a field is malformed
    #[error("{0}")]
    Validation(String),

    /// Status value outside the allowed set
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Unknown record id
    #[error("{0}")]
    NotFound(String),

    /// Missing or wrong admin token
    #[error("Unauthorized")]
    Unauthorized,

    /// Request body is not valid JSON for the endpoint
    #[error("Malformed payload")]
    MalformedPayload,

    /// Anything else; the detail is logged, never sent to the client
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for request-level results
pub type Result<T> = std::result::Result<T, AppError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl AppError {
    /// HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidStatus(_) | Self::MalformedPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                "Something went wrong. Please try again later.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
