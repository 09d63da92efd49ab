use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::{Attachment, FeedPost};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::vocabulary_column;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::PostStorage;

const POST_COLUMNS: &str =
    "id, author_id, author_name, author_role, title, content, kind, attachments, likes, created_at";

/// Repository for mural posts; attachments and likes are stored as JSON arrays
#[derive(Clone)]
pub struct PostRepository {
    db: DbConnection,
}

impl PostRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_post(row: &SqliteRow) -> Result<FeedPost> {
        let attachments: String = row.try_get("attachments")?;
        let likes: String = row.try_get("likes")?;

        Ok(FeedPost {
            id: row.try_get("id")?,
            author_id: row.try_get("author_id")?,
            author_name: row.try_get("author_name")?,
            author_role: vocabulary_column(row, "author_role")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            kind: vocabulary_column(row, "kind")?,
            attachments: serde_json::from_str::<Vec<Attachment>>(&attachments)
                .context("Corrupt attachments column")?,
            likes: serde_json::from_str::<Vec<String>>(&likes).context("Corrupt likes column")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl PostStorage for PostRepository {
    async fn store_post(&self, post: &FeedPost) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, author_name, author_role, title, content, kind,
                               attachments, likes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.author_name)
        .bind(post.author_role.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.kind.as_str())
        .bind(serde_json::to_string(&post.attachments)?)
        .bind(serde_json::to_string(&post.likes)?)
        .bind(&post.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_post(&self, post_id: &str) -> Result<Option<FeedPost>> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_post).transpose()
    }

    async fn list_posts(&self) -> Result<Vec<FeedPost>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, rowid DESC",
            POST_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_post).collect()
    }

    async fn update_likes(&self, post_id: &str, likes: &[String]) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE posts SET likes = ? WHERE id = ?
            "#,
        )
        .bind(serde_json::to_string(likes)?)
        .bind(post_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
