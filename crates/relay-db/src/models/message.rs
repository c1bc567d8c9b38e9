//! Chat message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `chat_messages` table
#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageModel {
    pub id: i64,
    pub username: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
