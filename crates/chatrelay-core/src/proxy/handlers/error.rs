use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Per-request failures, each mapped to a status and a one-field error body.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing or invalid Authorization header")]
    Unauthorized,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Request body too large")]
    PayloadTooLarge,

    /// Forwarding failed; the message is returned to the caller as-is.
    #[error("{0}")]
    Upstream(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Unauthorized => StatusCode::UNAUTHORIZED,
            ProxyError::InvalidBody => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
