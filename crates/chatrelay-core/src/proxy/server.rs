use axum::{
    routing::{get, post},
    Router,
};
use chatrelay_types::RelayConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::AppResult;
use crate::proxy::upstream::UpstreamClient;

/// Axum application state. Read-only after startup, shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Build state from a validated config, constructing the outbound client.
    pub fn new(config: RelayConfig) -> AppResult<Self> {
        let upstream = UpstreamClient::from_config(&config.upstream)?;
        Ok(Self::with_upstream(config, upstream))
    }

    /// Build state around an existing client.
    pub fn with_upstream(config: RelayConfig, upstream: UpstreamClient) -> Self {
        Self { config: Arc::new(config), upstream: Arc::new(upstream) }
    }
}

/// Build the relay router.
///
/// CORS is the outermost layer so that `OPTIONS` never reaches routing and
/// error responses carry the headers too.
pub fn build_router(state: AppState) -> Router<()> {
    use crate::proxy::{handlers, middleware};

    Router::new()
        .route("/chat/completions", post(handlers::chat::handle_chat_completions))
        .route("/health", get(handlers::common::handle_health))
        .fallback(handlers::common::handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(middleware::cors_middleware))
        .with_state(state)
}
