//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading, validating or writing configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Config file not found at the given path
    #[error("Config not found: {path}")]
    NotFound {
        /// Filesystem path where config was expected
        path: String,
    },

    /// Config file exists but could not be read
    #[error("Config read error for {path}: {message}")]
    ReadError {
        /// Filesystem path of the config file
        path: String,
        /// Description of the read failure
        message: String,
    },

    /// Config file parse error
    #[error("Config parse error: {message}")]
    ParseError {
        /// Description of the parse failure
        message: String,
    },

    /// Config validation error (invalid values)
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field(s) that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Refusing to overwrite an existing file
    #[error("Config already exists: {path}")]
    AlreadyExists {
        /// Filesystem path of the existing file
        path: String,
    },

    /// Config write error (permission denied, disk full, etc)
    #[error("Config write error: {message}")]
    WriteError {
        /// Description of the write failure
        message: String,
    },
}

impl ConfigError {
    /// Create a parse error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::ParseError { message: e.to_string() }
    }

    /// Create a write error from an IO error.
    pub fn from_io_error(e: &std::io::Error) -> Self {
        Self::WriteError { message: e.to_string() }
    }

    /// Flatten validator output into a single error.
    pub fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        Self::ValidationError { field: fields.join(", "), message: errors.to_string() }
    }
}
