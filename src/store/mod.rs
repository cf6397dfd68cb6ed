//! Chat store: single source of truth for thread and message state.
//!
//! [`ChatStore`] drives a [`ChatApi`] and reconciles results into a
//! [`ChatState`]. State changes happen only inside actions; readers take a
//! [`snapshot`](ChatStore::snapshot) or borrow through [`read`](ChatStore::read).
//!
//! ```ignore
//! use chatdesk::store::ChatStore;
//!
//! let store = ChatStore::new(api);
//! store.load_threads().await?;
//! store.send_message("hello").await?;
//! let count = store.read(|s| s.total_message_count());
//! ```
//!
//! The state lock is never held across an `.await`, so two actions can
//! interleave only at their API calls. A later `load_threads` that finishes
//! first is overwritten by an earlier one that finishes second.

mod actions;
mod failure;
mod replies;
mod state;
mod views;

pub use failure::{Action, ActionError};
pub use state::ChatState;

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::api::ChatApiClient;
use crate::config::{ClientConfig, ReplySource, DEFAULT_REPLY_DELAY};
use crate::traits::{ChatApi, HttpError};

use replies::ReplyScheduler;

/// Store backed by the production HTTP client.
pub type HttpChatStore = ChatStore<ChatApiClient>;

/// Result of a store action.
pub type ActionResult<T> = Result<T, ActionError>;

/// Owner of the chat state. Cloning is cheap and shares the same state.
pub struct ChatStore<A> {
    api: Arc<A>,
    state: Arc<RwLock<ChatState>>,
    replies: Arc<Mutex<ReplyScheduler>>,
    reply_delay: Duration,
    reply_source: ReplySource,
}

impl<A> Clone for ChatStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            replies: Arc::clone(&self.replies),
            reply_delay: self.reply_delay,
            reply_source: self.reply_source,
        }
    }
}

impl HttpChatStore {
    /// Build a store over the reqwest client, honoring every config setting.
    pub fn from_config(config: ClientConfig) -> Result<Self, HttpError> {
        let reply_delay = config.reply_delay;
        let reply_source = config.reply_source;
        let api = ChatApiClient::from_config(config)?;
        Ok(ChatStore::new(api)
            .with_reply_delay(reply_delay)
            .with_reply_source(reply_source))
    }
}

impl<A: ChatApi + 'static> ChatStore<A> {
    /// Create a store with an empty state and default reply settings.
    pub fn new(api: A) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(RwLock::new(ChatState::default())),
            replies: Arc::new(Mutex::new(ReplyScheduler::default())),
            reply_delay: DEFAULT_REPLY_DELAY,
            reply_source: ReplySource::default(),
        }
    }

    /// Set the delay before an assistant reply is appended.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Set where assistant replies come from.
    pub fn with_reply_source(mut self, source: ReplySource) -> Self {
        self.reply_source = source;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn reply_source(&self) -> ReplySource {
        self.reply_source
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ChatState {
        self.read_state().clone()
    }

    /// Run `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ChatState) -> R) -> R {
        f(&self.read_state())
    }

    /// Number of assistant replies scheduled but not yet delivered.
    pub fn pending_reply_count(&self) -> usize {
        self.lock_replies().len()
    }

    /// Abort all scheduled assistant replies.
    pub fn cancel_pending_replies(&self) -> usize {
        let cancelled = self.lock_replies().cancel_all();
        if cancelled > 0 {
            tracing::debug!(cancelled, "cancelled pending assistant replies");
        }
        cancelled
    }

    pub(crate) fn commit<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut self.write_state())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ChatState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ChatState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_replies(&self) -> MutexGuard<'_, ReplyScheduler> {
        self.replies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Marks one request in flight; releases it when dropped, whichever way
/// the action exits (success, failure, or the future being dropped).
struct RequestGuard<'a> {
    state: &'a RwLock<ChatState>,
}

impl<'a> RequestGuard<'a> {
    fn begin(state: &'a RwLock<ChatState>) -> Self {
        state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .begin_request();
        Self { state }
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .finish_request();
    }
}
