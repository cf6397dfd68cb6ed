//! Bookkeeping for delayed assistant replies.
//!
//! Each reply is a spawned task bound to the thread id captured when the
//! user message was sent. Tasks can be aborted individually by thread or
//! all at once.

use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::models::ThreadId;

#[derive(Debug)]
struct PendingReply {
    thread_id: ThreadId,
    handle: JoinHandle<()>,
}

/// Tracks reply tasks that have not yet delivered.
#[derive(Debug, Default)]
pub(crate) struct ReplyScheduler {
    next_key: u64,
    pending: HashMap<u64, PendingReply>,
}

impl ReplyScheduler {
    /// Reserve a key for a task about to be spawned.
    pub(crate) fn reserve(&mut self) -> u64 {
        self.next_key += 1;
        self.next_key
    }

    /// Register a spawned reply task under a reserved key.
    pub(crate) fn register(&mut self, key: u64, thread_id: ThreadId, handle: JoinHandle<()>) {
        self.prune();
        self.pending.insert(key, PendingReply { thread_id, handle });
    }

    /// Called by a task once it has delivered (or dropped) its reply.
    pub(crate) fn complete(&mut self, key: u64) {
        self.pending.remove(&key);
    }

    /// Abort every pending reply whose thread fails `keep`. Returns how many were aborted.
    pub(crate) fn cancel_unless<F>(&mut self, keep: F) -> usize
    where
        F: Fn(ThreadId) -> bool,
    {
        let doomed: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, reply)| !keep(reply.thread_id))
            .map(|(key, _)| *key)
            .collect();

        for key in &doomed {
            if let Some(reply) = self.pending.remove(key) {
                reply.handle.abort();
            }
        }
        doomed.len()
    }

    /// Abort all pending replies. Returns how many were aborted.
    pub(crate) fn cancel_all(&mut self) -> usize {
        self.cancel_unless(|_| false)
    }

    /// Number of replies still waiting to be delivered.
    pub(crate) fn len(&self) -> usize {
        self.pending
            .values()
            .filter(|reply| !reply.handle.is_finished())
            .count()
    }

    #[cfg(test)]
    pub(crate) fn pending_for(&self, thread_id: ThreadId) -> usize {
        self.pending
            .values()
            .filter(|reply| reply.thread_id == thread_id && !reply.handle.is_finished())
            .count()
    }

    fn prune(&mut self) {
        self.pending.retain(|_, reply| !reply.handle.is_finished());
    }
}
