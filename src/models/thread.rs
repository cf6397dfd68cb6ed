use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, Message, ThreadId};

fn default_active() -> bool {
    true
}

/// A conversation thread as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Unique identifier across the store
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ThreadId,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Messages in insertion order; only ever appended to by the client
    #[serde(default)]
    pub messages: Vec<Message>,
    /// When the thread was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Bumped whenever a message is appended
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    /// Active/inactive toggle; carries no further meaning on the client
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Thread {
    /// Create an empty, active thread created now.
    pub fn new(id: ThreadId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    /// Builder-style helper to seed messages.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Append a message and bump `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`, even if the local clock
    /// lags the server that stamped the thread.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Replace all messages (used when reloading from the server).
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.touch();
    }

    /// Flip the active flag, returning the new value.
    pub fn toggle_active(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at).max(self.updated_at);
    }
}
