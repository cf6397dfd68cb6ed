//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP transport (GET, POST)
//! - [`ChatApi`] - the chat API operations the store drives

pub mod chat_api;
pub mod http;

pub use chat_api::ChatApi;
pub use http::{json_headers, Headers, HttpClient, HttpError, Response};
