//! Relay configuration models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use validator::{Validate, ValidationError};

/// Upstream chat-completion endpoint used when no config file overrides it.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.gptgod.online/v1/chat/completions";

// ============================================================================
// Default value functions for serde
// ============================================================================

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9998
}

fn default_body_limit() -> usize {
    100 * 1024 * 1024
}

fn default_shutdown_grace() -> u64 {
    30
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_model_mapping() -> HashMap<String, String> {
    HashMap::from([
        ("ggl-4".to_string(), "gpt-4-turbo".to_string()),
        ("gclaude-3-5-sonnet".to_string(), "claude-3-5-sonnet-20240620".to_string()),
        (
            "gclaude-3-5-sonnet-20241022".to_string(),
            "claude-3-5-sonnet-20241022".to_string(),
        ),
        ("gpt-4o".to_string(), "gpt-4o".to_string()),
    ])
}

fn validate_ip(value: &str) -> Result<(), ValidationError> {
    value.parse::<IpAddr>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("ip");
        err.message = Some(format!("'{}' is not an IP address", value).into());
        err
    })
}

fn validate_mapping(mapping: &HashMap<String, String>) -> Result<(), ValidationError> {
    if let Some((from, to)) = mapping.iter().find(|(k, v)| k.is_empty() || v.is_empty()) {
        let mut err = ValidationError::new("mapping");
        err.message = Some(format!("empty model name in mapping '{}' -> '{}'", from, to).into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Sections
// ============================================================================

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ServerConfig {
    /// IP address to bind
    #[validate(custom(function = "validate_ip"))]
    #[serde(default = "default_address")]
    pub address: String,
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body size in bytes
    #[validate(range(min = 1))]
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Seconds to wait for in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

impl ServerConfig {
    /// `address:port`, bracketing IPv6 addresses.
    pub fn socket_addr(&self) -> String {
        if self.address.contains(':') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

/// Outbound endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct UpstreamConfig {
    /// Full URL that every chat-completion request is POSTed to
    #[validate(url)]
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Bound on the whole outbound call; `None` waits indefinitely
    #[validate(range(min = 1))]
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Egress proxy (http, https or socks5 URL)
    #[validate(url)]
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { url: default_upstream_url(), request_timeout_secs: None, proxy_url: None }
    }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// Full relay configuration, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct RelayConfig {
    /// Listener settings
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    /// Outbound endpoint settings
    #[serde(default, alias = "api")]
    #[validate(nested)]
    pub upstream: UpstreamConfig,
    /// Client-facing model name -> upstream model name
    #[validate(custom(function = "validate_mapping"))]
    #[serde(default = "default_model_mapping")]
    pub model_mapping: HashMap<String, String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            model_mapping: default_model_mapping(),
        }
    }
}
