//! Payload shapes embedded in server events

use chrono::{DateTime, Utc};
use relay_core::{ChatMessage, Snowflake};
use serde::{Deserialize, Serialize};

/// Wire form of a stored chat message: `{ id, username, message, timestamp }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub id: Snowflake,
    /// Omitted for messages sent before the connection named itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessagePayload {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            id: msg.id,
            username: msg.username.clone(),
            message: msg.body.clone(),
            timestamp: msg.created_at,
        }
    }
}
