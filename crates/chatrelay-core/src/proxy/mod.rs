//! Proxy module - the `/chat/completions` forwarding service
//!
//! - `common`: model mapping and HTTP client construction
//! - `upstream`: the single outbound POST to the configured endpoint
//! - `handlers`: axum handlers
//! - `middleware`: CORS
//! - `server`: shared state and router assembly

pub mod common;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod upstream;

#[cfg(test)]
mod tests;

pub use server::{build_router, AppState};
pub use upstream::{ForwardHeaders, UpstreamClient, UpstreamReply};
