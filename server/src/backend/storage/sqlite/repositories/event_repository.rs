use anyhow::Result;
use async_trait::async_trait;
use shared::SchoolEvent;
use sqlx::Row;

use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::EventStorage;

/// Repository for the school calendar
#[derive(Clone)]
pub struct EventRepository {
    db: DbConnection,
}

impl EventRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventStorage for EventRepository {
    async fn store_event(&self, event: &SchoolEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, date, description, location)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.date)
        .bind(&event.description)
        .bind(&event.location)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<SchoolEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, date, description, location
            FROM events
            ORDER BY date ASC, title ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| -> Result<SchoolEvent> {
                Ok(SchoolEvent {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    date: row.try_get("date")?,
                    description: row.try_get("description")?,
                    location: row.try_get("location")?,
                })
            })
            .collect()
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, title: &str, date: &str) -> SchoolEvent {
        SchoolEvent {
            id: id.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            description: String::new(),
            location: "Playground".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_is_earliest_first() {
        let repo = EventRepository::new(DbConnection::init_test().await.unwrap());
        repo.store_event(&event("e1", "June party", "2024-06-21")).await.unwrap();
        repo.store_event(&event("e2", "Parents meeting", "2024-05-15")).await.unwrap();
        repo.store_event(&event("e3", "Zoo outing", "2024-05-30")).await.unwrap();

        let ids: Vec<String> = repo.list_events().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["e2", "e3", "e1"]);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_event() {
        let repo = EventRepository::new(DbConnection::init_test().await.unwrap());
        repo.store_event(&event("e1", "June party", "2024-06-21")).await.unwrap();

        assert!(repo.delete_event("e1").await.unwrap());
        assert!(!repo.delete_event("e1").await.unwrap());
        assert!(repo.list_events().await.unwrap().is_empty());
    }
}
