use anyhow::Result;
use async_trait::async_trait;
use shared::{ChatConfig, ChatMessage};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::ChatStorage;

/// Repository for direct messages and the chat opening hours
#[derive(Clone)]
pub struct ChatRepository {
    db: DbConnection,
}

impl ChatRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_message(row: &SqliteRow) -> Result<ChatMessage> {
        Ok(ChatMessage {
            id: row.try_get("id")?,
            sender_id: row.try_get("sender_id")?,
            receiver_id: row.try_get("receiver_id")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }
}

#[async_trait]
impl ChatStorage for ChatRepository {
    async fn get_chat_config(&self) -> Result<Option<ChatConfig>> {
        let row = sqlx::query(
            r#"
            SELECT start_hour, end_hour, is_enabled
            FROM chat_config
            WHERE id = 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(ChatConfig {
                start_hour: r.try_get::<i64, _>("start_hour")? as u32,
                end_hour: r.try_get::<i64, _>("end_hour")? as u32,
                is_enabled: r.try_get("is_enabled")?,
            })),
            None => Ok(None),
        }
    }

    async fn set_chat_config(&self, config: &ChatConfig) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO chat_config (id, start_hour, end_hour, is_enabled, updated_at)
            VALUES (1, ?, ?, ?, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(config.start_hour as i64)
        .bind(config.end_hour as i64)
        .bind(config.is_enabled)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn store_message(&self, message: &ChatMessage) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, content, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.sender_id)
        .bind(&message.receiver_id)
        .bind(&message.content)
        .bind(&message.timestamp)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_conversation(&self, user_a: &str, user_b: &str) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, content, timestamp
            FROM messages
            WHERE (sender_id = ? AND receiver_id = ?)
               OR (sender_id = ? AND receiver_id = ?)
            ORDER BY timestamp ASC, rowid ASC
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, from: &str, to: &str, timestamp: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            content: format!("hello from {}", from),
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn test_config_is_absent_until_saved() {
        let repo = ChatRepository::new(DbConnection::init_test().await.unwrap());
        assert!(repo.get_chat_config().await.unwrap().is_none());

        let config = ChatConfig { start_hour: 7, end_hour: 17, is_enabled: false };
        repo.set_chat_config(&config).await.unwrap();
        repo.set_chat_config(&config).await.unwrap();

        assert_eq!(repo.get_chat_config().await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn test_conversation_includes_both_directions_oldest_first() {
        let repo = ChatRepository::new(DbConnection::init_test().await.unwrap());
        repo.store_message(&message("m2", "b", "a", "2024-05-10T09:05:00+00:00")).await.unwrap();
        repo.store_message(&message("m1", "a", "b", "2024-05-10T09:00:00+00:00")).await.unwrap();
        repo.store_message(&message("m3", "a", "c", "2024-05-10T09:10:00+00:00")).await.unwrap();

        let ids: Vec<String> = repo
            .list_conversation("a", "b")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }
}
