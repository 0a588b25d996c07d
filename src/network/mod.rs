//! HTTP networking module
//!
//! Provides the outbound HTTP client shared by the translator and the
//! product search client.

mod client;
mod request;
mod user_agent;

pub use client::HttpClient;
pub use request::{HttpMethod, OutboundRequest, OutboundResponse, RequestBody};
pub use user_agent::{accept_json, browser_headers, default_user_agent};
