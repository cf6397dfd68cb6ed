//! Mock implementations for testing.
//!
//! Enables unit testing of the API client and store without network access.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
