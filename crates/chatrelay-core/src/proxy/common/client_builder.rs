use chatrelay_types::UpstreamConfig;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Build the shared outbound HTTP client.
///
/// No timeout is set unless `request_timeout_secs` is configured, so by
/// default a stalled upstream stalls the request it belongs to.
pub fn build_http_client(upstream: &UpstreamConfig) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().tcp_nodelay(true);

    if let Some(secs) = upstream.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    if let Some(url) = upstream.proxy_url.as_deref().filter(|u| !u.is_empty()) {
        let proxy = reqwest::Proxy::all(url)
            .map_err(|e| AppError::Client(format!("Invalid upstream proxy url: {}", e)))?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| AppError::Client(format!("Failed to build HTTP client: {}", e)))
}
