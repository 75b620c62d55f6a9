//! # chatrelay Types
//!
//! Configuration models and typed errors shared by the chatrelay crates.
//!
//! ```text
//!     chatrelay-types (this crate)
//!            │
//!            ▼
//!     chatrelay-core
//!            │
//!            ▼
//!     chatrelay-server
//! ```
//!
//! - **`models`** - `RelayConfig` and its sections, with compiled-in defaults
//! - **`error`** - `ConfigError` for load/validation failures

pub mod error;
pub mod models;

pub use error::ConfigError;
pub use models::{RelayConfig, ServerConfig, UpstreamConfig};
