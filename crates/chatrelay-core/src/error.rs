//! Unified error types for chatrelay core.

use chatrelay_types::ConfigError;
use thiserror::Error;

/// Main error type for library operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Network request failed (connect, send, or body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Result type alias for chatrelay operations.
pub type AppResult<T> = Result<T, AppError>;
