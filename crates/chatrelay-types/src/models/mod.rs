//! Domain models for chatrelay.

mod config;

pub use config::{RelayConfig, ServerConfig, UpstreamConfig, DEFAULT_UPSTREAM_URL};
