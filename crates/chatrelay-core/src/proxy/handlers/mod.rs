// Handlers module - API endpoint handlers

pub mod chat;
pub mod common;
pub mod error;

pub use error::ProxyError;
