//! Chat API trait abstraction.
//!
//! The store is generic over [`ChatApi`] so it can run against the HTTP
//! client, a mock-mode client, or a hand-written fake in tests.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{Message, Thread, ThreadId};

/// The six request/response operations exposed by the chat backend.
///
/// Every call is a fresh round trip: implementations must not retry or cache.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `GET /threads`
    async fn list_threads(&self) -> ApiResult<Vec<Thread>>;

    /// `GET /threads/{id}`; fails with `ApiError::NotFound` for unknown ids.
    async fn get_thread(&self, id: ThreadId) -> ApiResult<Thread>;

    /// `GET /messages/{thread_id}`
    async fn list_messages(&self, thread_id: ThreadId) -> ApiResult<Vec<Message>>;

    /// `POST /messages/{thread_id}`; the server records a user message.
    async fn send_message(&self, thread_id: ThreadId, text: &str) -> ApiResult<Message>;

    /// `POST /messages/{thread_id}/assistant`; the server records an assistant message.
    async fn send_assistant_message(&self, thread_id: ThreadId, text: &str) -> ApiResult<Message>;

    /// `POST /threads`
    async fn create_thread(&self, title: &str, first_message: &str) -> ApiResult<Thread>;
}
