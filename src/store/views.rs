//! Derived, read-only views over [`ChatState`].
//!
//! These are recomputed on every call; nothing is cached.

use crate::models::{Thread, ThreadId};

use super::ChatState;

impl ChatState {
    /// All threads in insertion order.
    pub fn all_threads(&self) -> &[Thread] {
        &self.threads
    }

    /// Threads whose active flag is set.
    pub fn active_threads(&self) -> Vec<&Thread> {
        self.threads.iter().filter(|t| t.is_active).collect()
    }

    pub fn current_thread_id(&self) -> Option<ThreadId> {
        self.current_thread_id
    }

    /// The thread matching the current id, if it exists.
    pub fn current_thread(&self) -> Option<&Thread> {
        self.current_thread_id.and_then(|id| self.thread(id))
    }

    pub fn thread(&self, id: ThreadId) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == id)
    }

    pub fn contains_thread(&self, id: ThreadId) -> bool {
        self.thread(id).is_some()
    }

    /// Sum of message counts over all threads.
    pub fn total_message_count(&self) -> usize {
        self.threads.iter().map(Thread::message_count).sum()
    }

    pub fn total_thread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn active_thread_count(&self) -> usize {
        self.threads.iter().filter(|t| t.is_active).count()
    }

    /// True while at least one API request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    fn sample() -> ChatState {
        let mut a = Thread::new(1, "a");
        a.messages = vec![Message::user(1, "x"), Message::assistant(2, "y")];
        let mut b = Thread::new(2, "b");
        b.is_active = false;
        b.messages = vec![Message::user(3, "z")];
        let c = Thread::new(3, "c");
        ChatState::with_threads(vec![a, b, c])
    }

    #[test]
    fn test_counts() {
        let state = sample();
        assert_eq!(state.total_thread_count(), 3);
        assert_eq!(state.active_thread_count(), 2);
        assert_eq!(state.total_message_count(), 3);
        assert!(state.active_thread_count() <= state.total_thread_count());
    }

    #[test]
    fn test_active_threads_preserve_order() {
        let state = sample();
        let ids: Vec<_> = state.active_threads().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_current_thread() {
        let mut state = sample();
        assert!(state.current_thread().is_none());

        state.set_current_thread_id(Some(2));
        assert_eq!(state.current_thread().map(|t| t.title.as_str()), Some("b"));

        state.set_current_thread_id(Some(99));
        assert_eq!(state.current_thread_id(), Some(99));
        assert!(state.current_thread().is_none());
    }

    #[test]
    fn test_empty_state() {
        let state = ChatState::new();
        assert!(state.all_threads().is_empty());
        assert_eq!(state.total_message_count(), 0);
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }
}
