//! Common test utilities for integration tests.
//!
//! Fixtures for the backend's JSON shapes and a store wired to a
//! wiremock server.

#![allow(dead_code)]

use std::time::Duration;

use chatdesk::config::ClientConfig;
use chatdesk::store::HttpChatStore;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Wire form of a message.
pub fn message_json(id: i64, text: &str, sender: &str) -> Value {
    json!({
        "id": id,
        "text": text,
        "sender": sender,
        "timestamp": 1_700_000_000_000i64
    })
}

/// Wire form of a thread with the given messages.
pub fn thread_json(id: i64, title: &str, messages: Vec<Value>) -> Value {
    json!({
        "id": id,
        "title": title,
        "messages": messages,
        "createdAt": 1_700_000_000_000i64,
        "updatedAt": 1_700_000_000_000i64,
        "isActive": true
    })
}

/// Config pointing at the mock server.
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.uri())
        .with_request_timeout(Duration::from_secs(5))
        .with_reply_delay(Duration::from_millis(50))
}

/// Production store talking to the mock server.
pub fn store_for(server: &MockServer) -> HttpChatStore {
    HttpChatStore::from_config(config_for(server)).expect("reqwest client should build")
}

/// Poll `check` until it holds or two seconds pass.
pub async fn wait_until<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
