use anyhow::Result;
use async_trait::async_trait;
use shared::{LessonPlan, PlanStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::vocabulary_column;
use crate::backend::storage::sqlite::connection::DbConnection;
use crate::backend::storage::LessonPlanStorage;

const PLAN_COLUMNS: &str = "id, teacher_id, class_id, grade, shift, structure, date, lesson_number, objective, content, \
     materials, curriculum_codes, assessment, status, manager_feedback, created_at";

/// Repository for lesson plans
#[derive(Clone)]
pub struct LessonPlanRepository {
    db: DbConnection,
}

impl LessonPlanRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_plan(row: &SqliteRow) -> Result<LessonPlan> {
        Ok(LessonPlan {
            id: row.try_get("id")?,
            teacher_id: row.try_get("teacher_id")?,
            class_id: row.try_get("class_id")?,
            grade: row.try_get("grade")?,
            shift: row.try_get("shift")?,
            structure: row.try_get("structure")?,
            date: row.try_get("date")?,
            lesson_number: row.try_get("lesson_number")?,
            objective: row.try_get("objective")?,
            content: row.try_get("content")?,
            materials: row.try_get("materials")?,
            curriculum_codes: row.try_get("curriculum_codes")?,
            assessment: row.try_get("assessment")?,
            status: vocabulary_column(row, "status")?,
            manager_feedback: row.try_get("manager_feedback")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl LessonPlanStorage for LessonPlanRepository {
    async fn store_plan(&self, plan: &LessonPlan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO lesson_plans (id, teacher_id, class_id, grade, shift, structure, date,
                                      lesson_number, objective, content, materials,
                                      curriculum_codes, assessment, status, manager_feedback,
                                      created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.teacher_id)
        .bind(&plan.class_id)
        .bind(&plan.grade)
        .bind(&plan.shift)
        .bind(&plan.structure)
        .bind(&plan.date)
        .bind(&plan.lesson_number)
        .bind(&plan.objective)
        .bind(&plan.content)
        .bind(&plan.materials)
        .bind(&plan.curriculum_codes)
        .bind(&plan.assessment)
        .bind(plan.status.as_str())
        .bind(&plan.manager_feedback)
        .bind(&plan.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_plan(&self, plan_id: &str) -> Result<Option<LessonPlan>> {
        let row = sqlx::query(&format!("SELECT {} FROM lesson_plans WHERE id = ?", PLAN_COLUMNS))
            .bind(plan_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_plan).transpose()
    }

    async fn list_plans(&self) -> Result<Vec<LessonPlan>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM lesson_plans ORDER BY date DESC, created_at DESC",
            PLAN_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_plan).collect()
    }

    async fn list_plans_for_teacher(&self, teacher_id: &str) -> Result<Vec<LessonPlan>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM lesson_plans WHERE teacher_id = ? ORDER BY date DESC, created_at DESC",
            PLAN_COLUMNS
        ))
        .bind(teacher_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_plan).collect()
    }

    async fn update_plan_review(&self, plan_id: &str, status: PlanStatus, feedback: Option<&str>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE lesson_plans SET status = ?, manager_feedback = ? WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(feedback)
        .bind(plan_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, teacher_id: &str, date: &str) -> LessonPlan {
        LessonPlan {
            id: id.to_string(),
            teacher_id: teacher_id.to_string(),
            class_id: "c1".to_string(),
            grade: "Toddlers".to_string(),
            shift: "Morning".to_string(),
            structure: String::new(),
            date: date.to_string(),
            lesson_number: "1".to_string(),
            objective: "Recognise colours".to_string(),
            content: "Painting with primary colours".to_string(),
            materials: "Paint, paper".to_string(),
            curriculum_codes: "EI02TS02".to_string(),
            assessment: "Observation".to_string(),
            status: PlanStatus::Pending,
            manager_feedback: None,
            created_at: "2024-05-01T10:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_for_teacher_and_review() {
        let repo = LessonPlanRepository::new(DbConnection::init_test().await.unwrap());
        repo.store_plan(&plan("p1", "t1", "2024-05-10")).await.unwrap();
        repo.store_plan(&plan("p2", "t1", "2024-05-12")).await.unwrap();
        repo.store_plan(&plan("p3", "t2", "2024-05-11")).await.unwrap();

        let mine: Vec<String> = repo
            .list_plans_for_teacher("t1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(mine, vec!["p2", "p1"]);
        assert_eq!(repo.list_plans().await.unwrap().len(), 3);

        repo.update_plan_review("p1", PlanStatus::Approved, Some("Great plan"))
            .await
            .unwrap();
        let reviewed = repo.get_plan("p1").await.unwrap().unwrap();
        assert_eq!(reviewed.status, PlanStatus::Approved);
        assert_eq!(reviewed.manager_feedback.as_deref(), Some("Great plan"));
        assert_eq!(reviewed.grade, "Toddlers");
        assert_eq!(reviewed.shift, "Morning");
    }
}
