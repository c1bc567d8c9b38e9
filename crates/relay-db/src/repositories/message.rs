//! PostgreSQL implementation of MessageStore

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::{ChatMessage, NewChatMessage};
use relay_core::traits::{MessageStore, RepoResult};
use relay_core::value_objects::SnowflakeGenerator;

use crate::mappers::ChatMessageInsert;
use crate::models::ChatMessageModel;

use super::error::map_db_error;

/// PostgreSQL-backed message store
#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
    ids: Arc<SnowflakeGenerator>,
}

impl PgMessageStore {
    pub fn new(pool: PgPool, ids: Arc<SnowflakeGenerator>) -> Self {
        Self { pool, ids }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    #[instrument(skip(self, message), fields(username = ?message.username))]
    async fn append(&self, message: NewChatMessage) -> RepoResult<ChatMessage> {
        let message = message.into_message(self.ids.generate(), Utc::now());
        let row = ChatMessageInsert::new(&message);

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, username, body, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(row.id)
        .bind(row.username)
        .bind(row.body)
        .bind(row.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(message)
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: usize) -> RepoResult<Vec<ChatMessage>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        // Newest first from the index, then flipped to oldest-first
        let mut rows = sqlx::query_as::<_, ChatMessageModel>(
            r#"
            SELECT id, username, body, created_at
            FROM chat_messages
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.reverse();

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }
}
