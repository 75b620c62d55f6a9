use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use bytes::Bytes;
use chatrelay_types::UpstreamConfig;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::proxy::common::build_http_client;

/// Headers copied from the inbound request onto the outbound one.
#[derive(Debug, Clone)]
pub struct ForwardHeaders {
    pub content_type: Option<HeaderValue>,
    pub accept: Option<HeaderValue>,
    pub authorization: HeaderValue,
}

impl ForwardHeaders {
    /// Collect the forwarded headers, or `None` when Authorization is
    /// missing or not of the form `Bearer <token>`.
    pub fn from_request(headers: &HeaderMap) -> Option<Self> {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .filter(|v| v.as_bytes().starts_with(b"Bearer "))?
            .clone();

        Some(Self {
            content_type: headers.get(header::CONTENT_TYPE).cloned(),
            accept: headers.get(header::ACCEPT).cloned(),
            authorization,
        })
    }

    /// The exact header set for the outbound request.
    ///
    /// The body sent upstream is always JSON, so a request that arrived
    /// without Content-Type goes out as `application/json`.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(3);
        map.insert(
            header::CONTENT_TYPE,
            self.content_type
                .clone()
                .unwrap_or_else(|| HeaderValue::from_static("application/json")),
        );
        if let Some(accept) = &self.accept {
            map.insert(header::ACCEPT, accept.clone());
        }
        map.insert(header::AUTHORIZATION, self.authorization.clone());
        map
    }
}

/// Fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Forwards request bodies to the one configured upstream URL.
pub struct UpstreamClient {
    http_client: Client,
    url: String,
}

impl UpstreamClient {
    /// Create a client around a pre-built `reqwest::Client`.
    pub fn new(http_client: Client, url: impl Into<String>) -> Self {
        Self { http_client, url: url.into() }
    }

    /// Build the HTTP client from config (timeout, egress proxy) and wrap it.
    pub fn from_config(upstream: &UpstreamConfig) -> AppResult<Self> {
        Ok(Self::new(build_http_client(upstream)?, upstream.url.clone()))
    }

    /// POST `body` upstream once and wait for the complete response.
    ///
    /// Non-2xx statuses are not errors here; only serialization, transport
    /// and body-read failures are.
    pub async fn forward(
        &self,
        body: &Map<String, Value>,
        headers: &ForwardHeaders,
    ) -> AppResult<UpstreamReply> {
        let payload = serde_json::to_vec(body)?;

        tracing::info!("Forwarding request to: {}", self.url);
        tracing::debug!("Request parameters: {}", String::from_utf8_lossy(&payload));

        let header_map = headers.to_header_map();
        for name in header_map.keys() {
            tracing::debug!("Setting header: {}", name);
        }

        let response =
            self.http_client.post(&self.url).headers(header_map).body(payload).send().await?;

        let status = response.status();
        let body = response.bytes().await?;

        tracing::info!("Response status code: {}", status.as_u16());

        Ok(UpstreamReply { status, body })
    }
}
