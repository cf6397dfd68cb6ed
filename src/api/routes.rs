//! Endpoint paths of the chat backend.

use crate::models::ThreadId;

pub const THREADS: &str = "/threads";

pub fn thread(id: ThreadId) -> String {
    format!("{}/{}", THREADS, id)
}

pub fn messages(thread_id: ThreadId) -> String {
    format!("/messages/{}", thread_id)
}

pub fn assistant_messages(thread_id: ThreadId) -> String {
    format!("{}/assistant", messages(thread_id))
}
