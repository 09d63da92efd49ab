//! Lesson plans written by teachers and approved by managers.

use chrono::Utc;
use shared::{LessonPlan, PlanStatus, SubmitPlanRequest, UserRole};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::directory_service::{not_found, require_manager, required};
use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::models::{canonical_date, generate_id};
use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::{ClassStorage, Connection, LessonPlanStorage};

#[derive(Clone)]
pub struct LessonPlanService<C: Connection> {
    plan_repository: C::LessonPlanRepository,
    class_repository: C::ClassRepository,
}

impl<C: Connection> LessonPlanService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            plan_repository: connection.create_lesson_plan_repository(),
            class_repository: connection.create_class_repository(),
        }
    }

    /// File a pending plan for one of the teacher's own classes
    pub async fn submit_plan(&self, teacher: &UserAccount, request: SubmitPlanRequest) -> ServiceResult<LessonPlan> {
        if teacher.role != UserRole::Teacher {
            return Err(ServiceError::Unauthorized("Only teachers submit lesson plans".to_string()));
        }

        let class = self
            .class_repository
            .get_class(&request.class_id)
            .await?
            .ok_or_else(|| not_found("Class", &request.class_id))?;
        if class.teacher_id != teacher.id {
            warn!("Teacher {} does not teach class {}", teacher.id, class.id);
            return Err(ServiceError::Unauthorized(format!("You do not teach class {}", class.name)));
        }

        let date = canonical_date(&request.date).ok_or_else(|| ServiceError::Invalid(format!("Invalid lesson date '{}'", request.date)))?;

        let grade = match request.grade.trim() {
            "" => class.name.clone(),
            given => given.to_string(),
        };

        let plan = LessonPlan {
            id: generate_id("plan"),
            teacher_id: teacher.id.clone(),
            class_id: class.id,
            grade,
            shift: request.shift.trim().to_string(),
            structure: request.structure.trim().to_string(),
            date,
            lesson_number: request.lesson_number.trim().to_string(),
            objective: required("Objective", &request.objective)?,
            content: required("Content", &request.content)?,
            materials: request.materials.trim().to_string(),
            curriculum_codes: request.curriculum_codes.trim().to_string(),
            assessment: request.assessment.trim().to_string(),
            status: PlanStatus::Pending,
            manager_feedback: None,
            created_at: Utc::now().to_rfc3339(),
        };
        self.plan_repository.store_plan(&plan).await?;

        info!("Teacher {} submitted plan {} for {}", plan.teacher_id, plan.id, plan.date);
        Ok(plan)
    }

    pub async fn approve_plan(&self, manager: &UserAccount, plan_id: &str, feedback: &str) -> ServiceResult<LessonPlan> {
        require_manager(manager)?;

        let mut plan = self
            .plan_repository
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| not_found("Lesson plan", plan_id))?;

        let feedback = Some(feedback.trim().to_string()).filter(|f| !f.is_empty());
        self.plan_repository
            .update_plan_review(&plan.id, PlanStatus::Approved, feedback.as_deref())
            .await?;

        plan.status = PlanStatus::Approved;
        plan.manager_feedback = feedback;
        info!("Plan {} approved by {}", plan.id, manager.id);
        Ok(plan)
    }

    /// Managers see every plan, teachers their own
    pub async fn list_plans(&self, user: &UserAccount) -> ServiceResult<Vec<LessonPlan>> {
        match user.role {
            UserRole::Manager => Ok(self.plan_repository.list_plans().await?),
            UserRole::Teacher => Ok(self.plan_repository.list_plans_for_teacher(&user.id).await?),
            UserRole::Guardian => Err(ServiceError::Unauthorized(
                "Lesson plans are visible to staff only".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::test_support::*;
    use crate::backend::storage::DbConnection;

    async fn create_test_service() -> (LessonPlanService<DbConnection>, DbConnection) {
        let db = seeded_school().await;
        (LessonPlanService::new(Arc::new(db.clone())), db)
    }

    fn request(class_id: &str, date: &str) -> SubmitPlanRequest {
        SubmitPlanRequest {
            class_id: class_id.to_string(),
            date: date.to_string(),
            lesson_number: "3".to_string(),
            objective: "Explore textures".to_string(),
            content: "Sensory tray with sand and water".to_string(),
            materials: "Sand, water, trays".to_string(),
            curriculum_codes: "EI01ET01".to_string(),
            assessment: "Observation".to_string(),
            grade: String::new(),
            shift: String::new(),
            structure: String::new(),
        }
    }

    #[tokio::test]
    async fn test_teacher_submits_for_own_class_only() {
        let (service, db) = create_test_service().await;
        let teacher = user(&db, TEACHER_ID).await;
        let manager = user(&db, MANAGER_ID).await;

        let plan = service.submit_plan(&teacher, request(CLASS_ID, "2024-05-13")).await.unwrap();
        assert_eq!(plan.status, PlanStatus::Pending);

        let foreign = service.submit_plan(&teacher, request(OTHER_CLASS_ID, "2024-05-13")).await;
        assert!(matches!(foreign, Err(ServiceError::Unauthorized(_))));

        let by_manager = service.submit_plan(&manager, request(CLASS_ID, "2024-05-13")).await;
        assert!(matches!(by_manager, Err(ServiceError::Unauthorized(_))));

        let bad_date = service.submit_plan(&teacher, request(CLASS_ID, "13/05/2024")).await;
        assert!(matches!(bad_date, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_grade_defaults_to_class_name() {
        let (service, db) = create_test_service().await;
        let teacher = user(&db, TEACHER_ID).await;

        let plan = service.submit_plan(&teacher, request(CLASS_ID, "2024-05-13")).await.unwrap();
        assert_eq!(plan.grade, "Toddlers");
        assert_eq!(plan.shift, "");
        assert_eq!(plan.structure, "");

        let mut custom = request(CLASS_ID, "2024-05-14");
        custom.grade = " Nursery II ".to_string();
        custom.shift = "Afternoon".to_string();
        custom.structure = "Circle time".to_string();
        let plan = service.submit_plan(&teacher, custom).await.unwrap();
        assert_eq!(plan.grade, "Nursery II");
        assert_eq!(plan.shift, "Afternoon");
        assert_eq!(plan.structure, "Circle time");

        let stored = service.list_plans(&teacher).await.unwrap();
        assert!(stored.iter().any(|p| p.grade == "Nursery II" && p.structure == "Circle time"));
    }

    #[tokio::test]
    async fn test_approval_and_visibility() {
        let (service, db) = create_test_service().await;
        let teacher = user(&db, TEACHER_ID).await;
        let other_teacher = user(&db, OTHER_TEACHER_ID).await;
        let manager = user(&db, MANAGER_ID).await;
        let guardian = user(&db, GUARDIAN_ID).await;

        let plan = service.submit_plan(&teacher, request(CLASS_ID, "2024-05-13")).await.unwrap();
        service
            .submit_plan(&other_teacher, request(OTHER_CLASS_ID, "2024-05-14"))
            .await
            .unwrap();

        let denied = service.approve_plan(&teacher, &plan.id, "ok").await;
        assert!(matches!(denied, Err(ServiceError::Unauthorized(_))));

        let approved = service.approve_plan(&manager, &plan.id, " Lovely idea ").await.unwrap();
        assert_eq!(approved.status, PlanStatus::Approved);
        assert_eq!(approved.manager_feedback.as_deref(), Some("Lovely idea"));

        assert_eq!(service.list_plans(&manager).await.unwrap().len(), 2);
        let own = service.list_plans(&teacher).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].status, PlanStatus::Approved);
        assert!(matches!(service.list_plans(&guardian).await, Err(ServiceError::Unauthorized(_))));
    }
}
