//! Locally synthesized responses used in mock mode and for simulated
//! assistant replies.

use uuid::Uuid;

use crate::models::{Message, Thread};

/// Largest integer a JavaScript client can represent exactly (2^53 - 1).
const MAX_SAFE_ID: u64 = (1 << 53) - 1;

/// Random positive id in `1..=2^53-1`.
pub fn random_id() -> i64 {
    let (high, _) = Uuid::new_v4().as_u64_pair();
    ((high % MAX_SAFE_ID) + 1) as i64
}

/// User message the server would have returned for `text`.
pub fn user_message(text: &str) -> Message {
    Message::user(random_id(), text)
}

/// Thread the server would have returned for a create request.
pub fn thread(title: &str, first_message: &str) -> Thread {
    let mut thread = Thread::new(random_id(), title);
    thread.messages.push(user_message(first_message));
    thread.updated_at = thread.created_at;
    thread
}

/// Text of the stand-in assistant reply to `text`.
pub fn assistant_reply_text(text: &str) -> String {
    format!(
        "Response to \"{}\". This is a simulated assistant reply.",
        text
    )
}

/// Stand-in assistant reply to a user message.
pub fn assistant_reply(text: &str) -> Message {
    Message::assistant(random_id(), assistant_reply_text(text))
}
