//! Test fixtures
//!
//! Client frames and unique display names.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A display name no other test uses
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

pub fn init_frame(username: &str) -> Value {
    json!({ "type": "init", "username": username })
}

pub fn message_frame(text: &str) -> Value {
    json!({ "type": "message", "message": text })
}

pub fn typing_frame() -> Value {
    json!({ "type": "typing" })
}

/// `message` field of a `system` event, if `event` is one
pub fn system_text(event: &Value) -> Option<&str> {
    if event["type"] == "system" {
        event["message"].as_str()
    } else {
        None
    }
}
