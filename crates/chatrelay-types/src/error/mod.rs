//! Typed error definitions for chatrelay.

mod config;

pub use config::ConfigError;
