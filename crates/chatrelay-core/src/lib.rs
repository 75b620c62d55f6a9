//! # chatrelay Core
//!
//! Library half of chatrelay: a single-route proxy that accepts
//! `POST /chat/completions`, rewrites the `model` field through a static
//! mapping and forwards the request to one fixed upstream.
//!
//! ```text
//! chatrelay-core/src/
//! ├── modules/config.rs   # load/save RelayConfig from JSON
//! └── proxy/
//!     ├── common/         # model mapping, reqwest client builder
//!     ├── handlers/       # POST /chat/completions, /health, fallback
//!     ├── middleware/     # CORS headers + OPTIONS short-circuit
//!     ├── upstream/       # UpstreamClient (the forwarder)
//!     └── server.rs       # AppState + router
//! ```

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod modules;
pub mod proxy;

pub use error::{AppError, AppResult};
