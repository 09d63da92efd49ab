use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::RoutineFields;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::vocabulary_column;
use crate::backend::domain::models::routine::RoutineRecord;
use crate::backend::domain::models::{format_date, parse_date};
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::RoutineStorage;

const ROUTINE_COLUMNS: &str = "id, student_id, date, attendance, breakfast, lunch, afternoon_snack, \
     dinner, hydration, bath, bowel_movement, diapers, nap, activities, observations, mood, \
     author_id, updated_at";

/// Repository for daily routine records
#[derive(Clone)]
pub struct RoutineRepository {
    db: DbConnection,
}

impl RoutineRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_record(row: &SqliteRow) -> Result<RoutineRecord> {
        let raw_date: String = row.try_get("date")?;
        let date = parse_date(&raw_date)
            .with_context(|| format!("Corrupt routine date '{}'", raw_date))?;
        let raw_updated: String = row.try_get("updated_at")?;
        let updated_at = DateTime::parse_from_rfc3339(&raw_updated)
            .with_context(|| format!("Corrupt routine timestamp '{}'", raw_updated))?
            .with_timezone(&Utc);

        Ok(RoutineRecord {
            id: row.try_get("id")?,
            student_id: row.try_get("student_id")?,
            date,
            fields: RoutineFields {
                attendance: vocabulary_column(row, "attendance")?,
                breakfast: vocabulary_column(row, "breakfast")?,
                lunch: vocabulary_column(row, "lunch")?,
                afternoon_snack: vocabulary_column(row, "afternoon_snack")?,
                dinner: vocabulary_column(row, "dinner")?,
                hydration: vocabulary_column(row, "hydration")?,
                bath: vocabulary_column(row, "bath")?,
                bowel_movement: row.try_get("bowel_movement")?,
                diapers: vocabulary_column(row, "diapers")?,
                nap: vocabulary_column(row, "nap")?,
                activities: row.try_get("activities")?,
                observations: row.try_get("observations")?,
                mood: vocabulary_column(row, "mood")?,
            },
            author_id: row.try_get("author_id")?,
            updated_at,
        })
    }
}

#[async_trait]
impl RoutineStorage for RoutineRepository {
    async fn upsert_routine(&self, record: &RoutineRecord) -> Result<String> {
        let fields = &record.fields;
        // One statement: the row is either inserted whole or replaced whole
        let row = sqlx::query(
            r#"
            INSERT INTO routines (
                id, student_id, date, attendance, breakfast, lunch, afternoon_snack,
                dinner, hydration, bath, bowel_movement, diapers, nap, activities,
                observations, mood, author_id, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (student_id, date) DO UPDATE SET
                attendance = excluded.attendance,
                breakfast = excluded.breakfast,
                lunch = excluded.lunch,
                afternoon_snack = excluded.afternoon_snack,
                dinner = excluded.dinner,
                hydration = excluded.hydration,
                bath = excluded.bath,
                bowel_movement = excluded.bowel_movement,
                diapers = excluded.diapers,
                nap = excluded.nap,
                activities = excluded.activities,
                observations = excluded.observations,
                mood = excluded.mood,
                author_id = excluded.author_id,
                updated_at = excluded.updated_at
            RETURNING id
            "#,
        )
        .bind(&record.id)
        .bind(&record.student_id)
        .bind(format_date(record.date))
        .bind(fields.attendance.as_str())
        .bind(fields.breakfast.as_str())
        .bind(fields.lunch.as_str())
        .bind(fields.afternoon_snack.as_str())
        .bind(fields.dinner.as_str())
        .bind(fields.hydration.as_str())
        .bind(fields.bath.as_str())
        .bind(fields.bowel_movement)
        .bind(fields.diapers.as_str())
        .bind(fields.nap.as_str())
        .bind(&fields.activities)
        .bind(&fields.observations)
        .bind(fields.mood.as_str())
        .bind(&record.author_id)
        .bind(record.updated_at.to_rfc3339())
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.try_get("id")?)
    }

    async fn get_routine(&self, student_id: &str, date: NaiveDate) -> Result<Option<RoutineRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM routines WHERE student_id = ? AND date = ?",
            ROUTINE_COLUMNS
        ))
        .bind(student_id)
        .bind(format_date(date))
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn list_routines_for_student(&self, student_id: &str) -> Result<Vec<RoutineRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM routines WHERE student_id = ? ORDER BY date DESC",
            ROUTINE_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn list_student_ids_with_routine(&self, date: NaiveDate) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT student_id FROM routines WHERE date = ?
            "#,
        )
        .bind(format_date(date))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("student_id").map_err(Into::into))
            .collect()
    }
}
