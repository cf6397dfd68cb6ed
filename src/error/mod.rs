//! Error types for chatdesk.
//!
//! - [`ApiError`]: a failed round trip through the chat API client
//! - [`ConfigError`]: a configuration value that could not be parsed
//!
//! Transport failures ([`crate::traits::HttpError`]) convert into
//! [`ApiError::Transport`] unchanged. The store never surfaces these to the
//! UI; it records a fixed user-facing message instead.

mod api;
mod config;

pub use api::ApiError;
pub use config::ConfigError;

/// Type alias for results of API calls.
pub type ApiResult<T> = Result<T, ApiError>;
