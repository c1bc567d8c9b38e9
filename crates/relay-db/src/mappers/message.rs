//! Chat message entity <-> model mapper

use chrono::{DateTime, Utc};
use relay_core::entities::ChatMessage;
use relay_core::value_objects::Snowflake;

use crate::models::ChatMessageModel;

impl From<ChatMessageModel> for ChatMessage {
    fn from(model: ChatMessageModel) -> Self {
        ChatMessage {
            id: Snowflake::new(model.id),
            username: model.username,
            body: model.body,
            created_at: model.created_at,
        }
    }
}

/// Borrowed column values for inserting a chat message
pub struct ChatMessageInsert<'a> {
    pub id: i64,
    pub username: Option<&'a str>,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> ChatMessageInsert<'a> {
    pub fn new(message: &'a ChatMessage) -> Self {
        Self {
            id: message.id.into_inner(),
            username: message.username.as_deref(),
            body: &message.body,
            created_at: message.created_at,
        }
    }
}
