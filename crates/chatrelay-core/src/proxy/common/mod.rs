// Common module - shared helpers for the proxy path

pub mod client_builder;
pub mod model_mapping;

pub use client_builder::build_http_client;
pub use model_mapping::{apply_model_mapping, MappingOutcome};
