//! Chat message entity - a persisted line of chat

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A chat message as stored by a `MessageStore`
///
/// Immutable once created. The identifier is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Snowflake,
    /// Display name of the sender; `None` when sent before `init`
    pub username: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Check if the message was sent by a connection that never named itself
    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }
}

/// A chat message that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub username: Option<String>,
    pub body: String,
    /// Explicit timestamp; the store uses its own clock when absent
    pub created_at: Option<DateTime<Utc>>,
}

impl NewChatMessage {
    /// Create a new unsaved message
    pub fn new(username: Option<String>, body: impl Into<String>) -> Self {
        Self {
            username,
            body: body.into(),
            created_at: None,
        }
    }

    /// Pin the timestamp instead of letting the store assign one
    #[must_use]
    pub fn with_timestamp(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Materialize into a stored message with the given id
    ///
    /// `now` is used when no explicit timestamp was supplied.
    pub fn into_message(self, id: Snowflake, now: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id,
            username: self.username,
            body: self.body,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}
