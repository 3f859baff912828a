//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and the mapping
//! from core port errors to HTTP responses.

use crate::config::ConfigError;
use axum::http::StatusCode;
use mood_journal_core::ports::PortError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying the embedded database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Maps a core error to the status code and message returned to the client.
///
/// `StoreUnavailable` and `Cancelled` are the retryable cases; the client is
/// expected to offer a retry for them and a validation message for `InvalidInput`.
pub fn port_error_response(err: &PortError) -> (StatusCode, String) {
    let status = match err {
        PortError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PortError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PortError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        // Internal details stay in the logs.
        PortError::Unexpected(_) => "An unexpected internal error occurred".to_string(),
        other => other.to_string(),
    };
    (status, message)
}
