//! Prelude module for convenient imports.
//!
//! ```ignore
//! use chatdesk::prelude::*;
//! ```
//!
//! This will import the store, its state and errors, the API client and
//! trait, configuration, and the model types.

pub use crate::api::ChatApiClient;
pub use crate::config::{ClientConfig, ReplySource};
pub use crate::error::{ApiError, ApiResult, ConfigError};
pub use crate::models::{Message, MessageId, Sender, Thread, ThreadId};
pub use crate::store::{Action, ActionError, ActionResult, ChatState, ChatStore, HttpChatStore};
pub use crate::traits::{ChatApi, HttpClient, HttpError};
