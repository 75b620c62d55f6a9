use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use super::ProxyError;
use crate::proxy::common::{apply_model_mapping, MappingOutcome};
use crate::proxy::server::AppState;
use crate::proxy::upstream::ForwardHeaders;

/// `POST /chat/completions`
///
/// validate auth -> buffer body -> parse -> remap model -> forward -> return raw bytes.
/// The body stays unread until the auth check has passed, and the size limit
/// is enforced here so that an oversized request still gets a JSON error.
pub async fn handle_chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ProxyError> {
    let forward_headers = ForwardHeaders::from_request(&headers).ok_or_else(|| {
        warn!("Rejected request: missing or invalid Authorization header");
        ProxyError::Unauthorized
    })?;

    let limit = state.config.server.body_limit_bytes;
    let body = axum::body::to_bytes(body, limit).await.map_err(|e| {
        if is_length_limit(&e) {
            warn!("Rejected request: body exceeds {} bytes", limit);
            ProxyError::PayloadTooLarge
        } else {
            warn!("Rejected request: failed to read body: {}", e);
            ProxyError::InvalidBody
        }
    })?;

    let mut request_body: Map<String, Value> = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected request: invalid body: {}", e);
        ProxyError::InvalidBody
    })?;

    debug!("Received request: {}", String::from_utf8_lossy(&body));

    match apply_model_mapping(&mut request_body, &state.config.model_mapping) {
        MappingOutcome::Mapped { from, to } => info!("Model mapped: {} -> {}", from, to),
        MappingOutcome::Unmapped(model) => info!("Model passed through: {}", model),
        MappingOutcome::NoModel => debug!("Request has no string model field"),
    }

    let reply = state.upstream.forward(&request_body, &forward_headers).await.map_err(|e| {
        error!("Forwarding failed: {}", e);
        ProxyError::Upstream(e.to_string())
    })?;

    if !reply.status.is_success() {
        warn!("Upstream returned {}, relaying body with 200", reply.status);
    }
    debug!("Received response: {}", String::from_utf8_lossy(&reply.body));

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response())
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
