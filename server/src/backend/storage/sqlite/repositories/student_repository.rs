use anyhow::Result;
use async_trait::async_trait;
use shared::Student;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::StudentStorage;

/// Repository for students and the student/guardian link table
#[derive(Clone)]
pub struct StudentRepository {
    db: DbConnection,
}

impl StudentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Guardian ids of a student in the order they were linked
    async fn guardian_ids(&self, student_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT guardian_id FROM student_guardians
            WHERE student_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("guardian_id").map_err(Into::into))
            .collect()
    }

    async fn hydrate(&self, rows: Vec<SqliteRow>) -> Result<Vec<Student>> {
        let mut students = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let guardian_ids = self.guardian_ids(&id).await?;
            students.push(Student {
                id,
                name: row.try_get("name")?,
                class_id: row.try_get("class_id")?,
                guardian_ids,
            });
        }
        Ok(students)
    }

    async fn insert_links(tx: &mut Transaction<'_, Sqlite>, student: &Student) -> Result<()> {
        for (position, guardian_id) in student.guardian_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO student_guardians (student_id, guardian_id, position)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&student.id)
            .bind(guardian_id)
            .bind(position as i64)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStorage for StudentRepository {
    async fn store_student(&self, student: &Student) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO students (id, name, class_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.class_id)
        .execute(&mut *tx)
        .await?;

        Self::insert_links(&mut tx, student).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, class_id FROM students WHERE id = ?
            "#,
        )
        .bind(student_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, class_id FROM students ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        self.hydrate(rows).await
    }

    async fn list_students_in_class(&self, class_id: &str) -> Result<Vec<Student>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, class_id FROM students WHERE class_id = ? ORDER BY name ASC
            "#,
        )
        .bind(class_id)
        .fetch_all(self.db.pool())
        .await?;

        self.hydrate(rows).await
    }

    async fn list_students_for_guardian(&self, guardian_id: &str) -> Result<Vec<Student>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, s.class_id
            FROM students s
            JOIN student_guardians g ON g.student_id = s.id
            WHERE g.guardian_id = ?
            ORDER BY s.name ASC
            "#,
        )
        .bind(guardian_id)
        .fetch_all(self.db.pool())
        .await?;

        self.hydrate(rows).await
    }

    async fn update_student(&self, student: &Student) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            UPDATE students SET name = ?, class_id = ? WHERE id = ?
            "#,
        )
        .bind(&student.name)
        .bind(&student.class_id)
        .bind(&student.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM student_guardians WHERE student_id = ?
            "#,
        )
        .bind(&student.id)
        .execute(&mut *tx)
        .await?;

        Self::insert_links(&mut tx, student).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_student(&self, student_id: &str) -> Result<bool> {
        // Guardian links go with the student through ON DELETE CASCADE
        let result = sqlx::query(
            r#"
            DELETE FROM students WHERE id = ?
            "#,
        )
        .bind(student_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
