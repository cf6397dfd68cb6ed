//! State-changing actions of the chat store.

use std::collections::HashSet;

use crate::api::simulated;
use crate::config::ReplySource;
use crate::models::{Message, ThreadId};
use crate::traits::ChatApi;

use super::{Action, ActionError, ActionResult, ChatStore, RequestGuard};

impl<A: ChatApi + 'static> ChatStore<A> {
    /// Replace the thread list with the server's.
    ///
    /// Selects the first thread if none is selected. On failure the list is
    /// cleared and the error recorded. Pending replies for threads that are
    /// no longer present are cancelled.
    pub async fn load_threads(&self) -> ActionResult<()> {
        let guard = RequestGuard::begin(&self.state);
        let result = self.api.list_threads().await;

        let outcome = self.commit(|state| match result {
            Ok(threads) => {
                state.set_threads(threads);
                if state.current_thread_id.is_none() {
                    let first = state.threads.first().map(|t| t.id);
                    state.set_current_thread_id(first);
                }
                Ok(())
            }
            Err(err) => {
                state.set_error(Some(Action::LoadThreads.user_message().to_string()));
                state.set_threads(Vec::new());
                Err(ActionError::new(Action::LoadThreads, err))
            }
        });
        drop(guard);

        self.cancel_orphaned_replies();
        log_outcome(Action::LoadThreads, &outcome);
        outcome
    }

    /// Create a thread on the server, append it, and make it current.
    ///
    /// On failure the existing threads are left untouched.
    pub async fn create_thread(&self, title: &str, first_message: &str) -> ActionResult<ThreadId> {
        let guard = RequestGuard::begin(&self.state);
        let result = self.api.create_thread(title, first_message).await;

        let outcome = self.commit(|state| match result {
            Ok(thread) => {
                let id = thread.id;
                state.add_thread(thread);
                Ok(id)
            }
            Err(err) => {
                state.set_error(Some(Action::CreateThread.user_message().to_string()));
                Err(ActionError::new(Action::CreateThread, err))
            }
        });
        drop(guard);

        log_outcome(Action::CreateThread, &outcome);
        outcome
    }

    /// Send a user message to the current thread.
    ///
    /// Does nothing (and makes no request) when no thread is selected. The
    /// user message is appended before this returns; the assistant reply is
    /// appended later by a background task bound to the same thread id.
    /// Returns the appended user message.
    pub async fn send_message(&self, text: &str) -> ActionResult<Option<Message>> {
        let Some(thread_id) = self.read(|state| state.current_thread_id()) else {
            tracing::debug!("send_message ignored: no current thread");
            return Ok(None);
        };

        self.commit(|state| state.set_error(None));

        let message = match self.api.send_message(thread_id, text).await {
            Ok(message) => message,
            Err(err) => {
                self.commit(|state| {
                    state.set_error(Some(Action::SendMessage.user_message().to_string()))
                });
                let outcome: ActionResult<Option<Message>> =
                    Err(ActionError::new(Action::SendMessage, err));
                log_outcome(Action::SendMessage, &outcome);
                return outcome;
            }
        };

        if self.commit(|state| state.add_message(thread_id, message.clone())) {
            self.schedule_reply(thread_id, text);
        } else {
            tracing::warn!(thread_id, "thread vanished before the sent message could be appended");
        }
        Ok(Some(message))
    }

    /// Flip the active flag of a thread. Unknown ids are ignored.
    ///
    /// Returns the new flag, or `None` if the thread is unknown.
    pub fn toggle_thread(&self, id: ThreadId) -> Option<bool> {
        let toggled = self.commit(|state| state.toggle_thread_active(id));
        if toggled.is_none() {
            tracing::debug!(thread_id = id, "toggle_thread ignored: unknown thread");
        }
        toggled
    }

    /// Point the current selection at `id` (or clear it).
    ///
    /// The id is not checked against the known threads, so a selection can
    /// be made before the thread arrives.
    pub fn set_current_thread(&self, id: Option<ThreadId>) {
        self.commit(|state| state.set_current_thread_id(id));
    }

    /// Clear the recorded error.
    pub fn clear_error(&self) {
        self.commit(|state| state.set_error(None));
    }

    /// Fetch one thread from the server and replace (or append) it locally.
    pub async fn reload_thread(&self, id: ThreadId) -> ActionResult<()> {
        let guard = RequestGuard::begin(&self.state);
        let result = self.api.get_thread(id).await;

        let outcome = self.commit(|state| match result {
            Ok(thread) => {
                state.upsert_thread(thread);
                Ok(())
            }
            Err(err) => {
                state.set_error(Some(Action::LoadThread.user_message().to_string()));
                Err(ActionError::new(Action::LoadThread, err))
            }
        });
        drop(guard);

        log_outcome(Action::LoadThread, &outcome);
        outcome
    }

    /// Fetch a thread's messages from the server and replace the local copy.
    ///
    /// Returns whether a local thread was updated.
    pub async fn load_messages(&self, thread_id: ThreadId) -> ActionResult<bool> {
        let guard = RequestGuard::begin(&self.state);
        let result = self.api.list_messages(thread_id).await;

        let outcome = self.commit(|state| match result {
            Ok(messages) => Ok(state.replace_messages(thread_id, messages)),
            Err(err) => {
                state.set_error(Some(Action::LoadMessages.user_message().to_string()));
                Err(ActionError::new(Action::LoadMessages, err))
            }
        });
        drop(guard);

        log_outcome(Action::LoadMessages, &outcome);
        outcome
    }

    fn schedule_reply(&self, thread_id: ThreadId, text: &str) {
        let store = self.clone();
        let text = text.to_string();
        let delay = self.reply_delay;

        let mut replies = self.lock_replies();
        let key = replies.reserve();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.deliver_reply(thread_id, &text).await;
            store.lock_replies().complete(key);
        });
        replies.register(key, thread_id, handle);
        tracing::debug!(thread_id, delay_ms = delay.as_millis() as u64, "assistant reply scheduled");
    }

    async fn deliver_reply(&self, thread_id: ThreadId, text: &str) {
        if !self.read(|state| state.contains_thread(thread_id)) {
            tracing::debug!(thread_id, "assistant reply dropped: thread no longer present");
            return;
        }

        let reply = match self.reply_source {
            ReplySource::Simulated => simulated::assistant_reply(text),
            ReplySource::Server => {
                let reply_text = simulated::assistant_reply_text(text);
                match self.api.send_assistant_message(thread_id, &reply_text).await {
                    Ok(message) => message,
                    Err(err) => {
                        tracing::warn!(thread_id, error = %err, "assistant reply failed");
                        self.commit(|state| {
                            state.set_error(Some(Action::SendMessage.user_message().to_string()))
                        });
                        return;
                    }
                }
            }
        };

        if !self.commit(|state| state.add_message(thread_id, reply)) {
            tracing::debug!(thread_id, "assistant reply dropped: thread no longer present");
        }
    }

    fn cancel_orphaned_replies(&self) {
        let present: HashSet<ThreadId> =
            self.read(|state| state.all_threads().iter().map(|t| t.id).collect());
        let cancelled = self.lock_replies().cancel_unless(|id| present.contains(&id));
        if cancelled > 0 {
            tracing::debug!(cancelled, "cancelled replies for threads no longer loaded");
        }
    }
}

fn log_outcome<T>(action: Action, outcome: &ActionResult<T>) {
    match outcome {
        Ok(_) => tracing::debug!(action = action.as_str(), "action succeeded"),
        Err(err) => tracing::warn!(
            action = action.as_str(),
            error = %err.source,
            "action failed"
        ),
    }
}
