pub mod client;

pub use client::{ForwardHeaders, UpstreamClient, UpstreamReply};
