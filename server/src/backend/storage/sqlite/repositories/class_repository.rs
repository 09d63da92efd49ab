use anyhow::Result;
use async_trait::async_trait;
use shared::Class;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::ClassStorage;

/// Repository for classes
#[derive(Clone)]
pub struct ClassRepository {
    db: DbConnection,
}

impl ClassRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_class(row: &SqliteRow) -> Result<Class> {
        Ok(Class {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            teacher_id: row.try_get("teacher_id")?,
        })
    }
}

#[async_trait]
impl ClassStorage for ClassRepository {
    async fn store_class(&self, class: &Class) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO classes (id, name, teacher_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&class.id)
        .bind(&class.name)
        .bind(&class.teacher_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_class(&self, class_id: &str) -> Result<Option<Class>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, teacher_id FROM classes WHERE id = ?
            "#,
        )
        .bind(class_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_class).transpose()
    }

    async fn list_classes(&self) -> Result<Vec<Class>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, teacher_id FROM classes ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_class).collect()
    }

    async fn list_classes_for_teacher(&self, teacher_id: &str) -> Result<Vec<Class>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, teacher_id FROM classes WHERE teacher_id = ? ORDER BY name ASC
            "#,
        )
        .bind(teacher_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_class).collect()
    }

    async fn update_class(&self, class: &Class) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE classes SET name = ?, teacher_id = ? WHERE id = ?
            "#,
        )
        .bind(&class.name)
        .bind(&class.teacher_id)
        .bind(&class.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_class(&self, class_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM classes WHERE id = ?
            "#,
        )
        .bind(class_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
