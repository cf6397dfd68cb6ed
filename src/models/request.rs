use serde::{Deserialize, Serialize};

/// Body of `POST /messages/{thread_id}` and `POST /messages/{thread_id}/assistant`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub text: String,
}

impl SendMessageRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Body of `POST /threads`. The backend expects `first_message` in snake_case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateThreadRequest {
    pub title: String,
    pub first_message: String,
}

impl CreateThreadRequest {
    pub fn new(title: impl Into<String>, first_message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            first_message: first_message.into(),
        }
    }
}
