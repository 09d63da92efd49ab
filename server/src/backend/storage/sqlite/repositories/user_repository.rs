use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::vocabulary_column;
use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::UserStorage;

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> Result<UserAccount> {
        Ok(UserAccount {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: vocabulary_column(row, "role")?,
            function: row.try_get("function")?,
            password: row.try_get("password")?,
        })
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &UserAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, function, password)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.function)
        .bind(&user.password)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, role, function, password
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        // The column is declared COLLATE NOCASE
        let row = sqlx::query(
            r#"
            SELECT id, name, email, role, function, password
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email.trim())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, role, function, password
            FROM users
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users WHERE id = ?
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
