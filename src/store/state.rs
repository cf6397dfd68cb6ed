//! In-memory chat state and the mutations the store commits to it.

use std::collections::HashSet;

use crate::models::{Message, Thread, ThreadId};

/// Everything the client knows about threads and messages.
///
/// Only [`ChatStore`](super::ChatStore) mutates it; readers get a snapshot
/// or a borrowed view. Derived views live in `views.rs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Threads in insertion order, ids unique
    pub(crate) threads: Vec<Thread>,
    /// Selected thread; not validated against `threads`
    pub(crate) current_thread_id: Option<ThreadId>,
    /// Number of API requests awaiting a response
    pub(crate) in_flight: usize,
    /// Last user-facing error, cleared when an action starts
    pub(crate) error: Option<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from threads, as a successful load would leave it.
    pub fn with_threads(threads: Vec<Thread>) -> Self {
        let mut state = Self::new();
        state.set_threads(threads);
        state
    }

    pub(crate) fn begin_request(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub(crate) fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Replace the thread sequence. Later duplicates of an id are dropped.
    pub(crate) fn set_threads(&mut self, threads: Vec<Thread>) {
        let mut seen = HashSet::with_capacity(threads.len());
        let before = threads.len();
        self.threads = threads.into_iter().filter(|t| seen.insert(t.id)).collect();
        if self.threads.len() != before {
            tracing::warn!(
                dropped = before - self.threads.len(),
                "thread list contained duplicate ids"
            );
        }
    }

    pub(crate) fn set_current_thread_id(&mut self, id: Option<ThreadId>) {
        self.current_thread_id = id;
    }

    /// Append a new thread (or replace one with the same id) and select it.
    pub(crate) fn add_thread(&mut self, thread: Thread) {
        let id = thread.id;
        self.upsert_thread(thread);
        self.current_thread_id = Some(id);
    }

    /// Replace the thread with the same id in place, or append it.
    pub(crate) fn upsert_thread(&mut self, thread: Thread) {
        match self.threads.iter_mut().find(|t| t.id == thread.id) {
            Some(existing) => *existing = thread,
            None => self.threads.push(thread),
        }
    }

    /// Append a message to a thread. Returns false if the thread is unknown.
    pub(crate) fn add_message(&mut self, thread_id: ThreadId, message: Message) -> bool {
        match self.thread_mut(thread_id) {
            Some(thread) => {
                thread.push_message(message);
                true
            }
            None => false,
        }
    }

    /// Replace a thread's messages. Returns false if the thread is unknown.
    pub(crate) fn replace_messages(&mut self, thread_id: ThreadId, messages: Vec<Message>) -> bool {
        match self.thread_mut(thread_id) {
            Some(thread) => {
                thread.replace_messages(messages);
                true
            }
            None => false,
        }
    }

    /// Flip a thread's active flag. Returns the new value, or `None` if unknown.
    pub(crate) fn toggle_thread_active(&mut self, thread_id: ThreadId) -> Option<bool> {
        self.thread_mut(thread_id).map(Thread::toggle_active)
    }

    fn thread_mut(&mut self, id: ThreadId) -> Option<&mut Thread> {
        self.threads.iter_mut().find(|t| t.id == id)
    }
}
