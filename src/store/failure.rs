//! Action failures and their user-facing messages.

use std::fmt;

use crate::error::ApiError;

/// Store action that can fail at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    LoadThreads,
    CreateThread,
    SendMessage,
    LoadThread,
    LoadMessages,
}

impl Action {
    /// Fixed message recorded in the store's `error` when this action fails.
    pub fn user_message(self) -> &'static str {
        match self {
            Action::LoadThreads => "Failed to load threads",
            Action::CreateThread => "Failed to create thread",
            Action::SendMessage => "Failed to send message",
            Action::LoadThread => "Failed to load thread",
            Action::LoadMessages => "Failed to load messages",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::LoadThreads => "load_threads",
            Action::CreateThread => "create_thread",
            Action::SendMessage => "send_message",
            Action::LoadThread => "reload_thread",
            Action::LoadMessages => "load_messages",
        }
    }
}

/// A store action failed because its API call failed.
///
/// Displays as the fixed user-facing message; the underlying
/// [`ApiError`] is reachable through [`std::error::Error::source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    pub action: Action,
    pub source: ApiError,
}

impl ActionError {
    pub fn new(action: Action, source: ApiError) -> Self {
        Self { action, source }
    }

    pub fn user_message(&self) -> &'static str {
        self.action.user_message()
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action.user_message())
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
