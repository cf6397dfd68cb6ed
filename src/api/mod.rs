//! Chat API client.
//!
//! [`ChatApiClient`] wraps an [`HttpClient`](crate::traits::HttpClient) and
//! implements the six backend operations of [`ChatApi`](crate::traits::ChatApi):
//!
//! | Operation                | Request                              |
//! |--------------------------|--------------------------------------|
//! | `list_threads`           | `GET /threads`                       |
//! | `get_thread`             | `GET /threads/{id}`                  |
//! | `list_messages`          | `GET /messages/{thread_id}`          |
//! | `send_message`           | `POST /messages/{thread_id}`         |
//! | `send_assistant_message` | `POST /messages/{thread_id}/assistant` |
//! | `create_thread`          | `POST /threads`                      |

mod client;
pub mod routes;
pub mod simulated;

pub use client::ChatApiClient;
