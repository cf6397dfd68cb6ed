//! chatdesk - a client for threaded conversations with an assistant backend.
//!
//! The crate has two layers:
//! - [`api`]: a thin JSON client over the backend's `/threads` and
//!   `/messages` endpoints, with an optional mock mode
//! - [`store`]: the single source of truth for threads, the current
//!   selection, loading and error state, plus delayed assistant replies
//!
//! Transport sits behind the [`traits::HttpClient`] seam so both layers can
//! be tested without a network.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod store;
pub mod traits;
