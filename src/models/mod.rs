mod message;
mod request;
mod thread;

pub use message::{Message, Sender};
pub use request::{CreateThreadRequest, SendMessageRequest};
pub use thread::Thread;

use serde::Deserializer;

/// Identifier of a thread, unique across the store.
pub type ThreadId = i64;

/// Identifier of a message, unique within its thread.
pub type MessageId = i64;

/// Helper to deserialize an id sent either as an integer or as a numeric string
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a numeric string")
        }

        fn visit_i64<E>(self, value: i64) -> Result<i64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<i64, E>
        where
            E: de::Error,
        {
            i64::try_from(value).map_err(|_| E::custom(format!("id {} out of range", value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<i64, E>
        where
            E: de::Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id {:?}", value)))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
