use anyhow::Result;
use async_trait::async_trait;
use shared::MealSlot;
use sqlx::Row;

use super::vocabulary_column;
use crate::backend::domain::models::menu::MenuEntry;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::MenuStorage;

/// Repository for menu entries keyed by (date, meal)
#[derive(Clone)]
pub struct MenuRepository {
    db: DbConnection,
}

impl MenuRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MenuStorage for MenuRepository {
    async fn save_menu_day(&self, date: &str, meals: &[(MealSlot, String)]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        for (slot, description) in meals {
            sqlx::query(
                r#"
                INSERT INTO menu_entries (date, meal, description)
                VALUES (?, ?, ?)
                ON CONFLICT (date, meal) DO UPDATE SET description = excluded.description
                "#,
            )
            .bind(date)
            .bind(slot.as_str())
            .bind(description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_menu_entries(&self) -> Result<Vec<MenuEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT date, meal, description
            FROM menu_entries
            ORDER BY date DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| -> Result<MenuEntry> {
                Ok(MenuEntry {
                    date: row.try_get("date")?,
                    slot: vocabulary_column(row, "meal")?,
                    description: row.try_get("description")?,
                })
            })
            .collect()
    }

    async fn delete_menu_day(&self, date: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM menu_entries WHERE date = ?
            "#,
        )
        .bind(date)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meals(entries: &[(MealSlot, &str)]) -> Vec<(MealSlot, String)> {
        entries.iter().map(|(slot, d)| (*slot, d.to_string())).collect()
    }

    #[tokio::test]
    async fn test_save_replaces_same_date_and_meal() {
        let repo = MenuRepository::new(DbConnection::init_test().await.unwrap());
        repo.save_menu_day("2024-05-10", &meals(&[(MealSlot::Lunch, "Rice and beans")])).await.unwrap();
        repo.save_menu_day("2024-05-10", &meals(&[(MealSlot::Lunch, "Pasta"), (MealSlot::Dinner, "Soup")]))
            .await
            .unwrap();

        let entries = repo.list_menu_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .any(|e| e.slot == MealSlot::Lunch && e.description == "Pasta"));
    }

    #[tokio::test]
    async fn test_failed_meal_leaves_day_untouched() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = MenuRepository::new(db.clone());
        repo.save_menu_day("2024-05-10", &meals(&[(MealSlot::Lunch, "Fish")])).await.unwrap();

        sqlx::query(
            r#"
            CREATE TRIGGER reject_dinner BEFORE INSERT ON menu_entries
            WHEN NEW.meal = 'dinner'
            BEGIN SELECT RAISE(ABORT, 'dinner rejected'); END;
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let result = repo
            .save_menu_day("2024-05-10", &meals(&[(MealSlot::Lunch, "Pasta"), (MealSlot::Dinner, "Soup")]))
            .await;
        assert!(result.is_err());

        let entries = repo.list_menu_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Fish");
    }

    #[tokio::test]
    async fn test_delete_day_removes_every_meal() {
        let repo = MenuRepository::new(DbConnection::init_test().await.unwrap());
        repo.save_menu_day("2024-05-10", &meals(&[(MealSlot::Lunch, "Pasta"), (MealSlot::Breakfast, "Fruit")]))
            .await
            .unwrap();
        repo.save_menu_day("2024-05-11", &meals(&[(MealSlot::Lunch, "Fish")])).await.unwrap();

        assert_eq!(repo.delete_menu_day("2024-05-10").await.unwrap(), 2);
        let remaining = repo.list_menu_entries().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].date, "2024-05-11");
    }
}
