//! School directory: users, classes and students.
//!
//! Every mutation requires a manager. Guardian emails given at enrollment go
//! through the [`IdentityResolver`].

use shared::{Class, Student, UserRole};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::commands::directory::{
    CreateClassCommand, CreateUserCommand, EnrollStudentCommand,
};
use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::identity_resolver::{validate_email, IdentityResolver};
use crate::backend::domain::models::generate_id;
use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::{ClassStorage, Connection, StudentStorage, UserStorage};

#[derive(Clone)]
pub struct DirectoryService<C: Connection> {
    user_repository: C::UserRepository,
    class_repository: C::ClassRepository,
    student_repository: C::StudentRepository,
    identity_resolver: IdentityResolver<C>,
    placeholder_password: String,
}

impl<C: Connection> DirectoryService<C> {
    pub fn new(connection: Arc<C>, placeholder_password: String) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            class_repository: connection.create_class_repository(),
            student_repository: connection.create_student_repository(),
            identity_resolver: IdentityResolver::new(connection, placeholder_password.clone()),
            placeholder_password,
        }
    }

    // -- Students ---------------------------------------------------------

    /// Enroll a student, resolving each guardian email to a user
    pub async fn enroll_student(
        &self,
        actor: &UserAccount,
        command: EnrollStudentCommand,
    ) -> ServiceResult<Student> {
        require_manager(actor)?;
        info!("Enrolling student {} in class {}", command.name, command.class_id);

        let name = required("Student name", &command.name)?;
        self.require_class(&command.class_id).await?;
        let guardian_ids = self.resolve_guardians(&command.guardian_emails, &name).await?;

        let student = Student {
            id: generate_id("student"),
            name,
            class_id: command.class_id,
            guardian_ids,
        };
        self.student_repository.store_student(&student).await?;

        info!("Enrolled student {} with ID: {}", student.name, student.id);
        Ok(student)
    }

    /// Rename, move to another class and replace the guardian links
    pub async fn update_student(
        &self,
        actor: &UserAccount,
        student_id: &str,
        command: EnrollStudentCommand,
    ) -> ServiceResult<Student> {
        require_manager(actor)?;
        info!("Updating student {}", student_id);

        let existing = self
            .student_repository
            .get_student(student_id)
            .await?
            .ok_or_else(|| not_found("Student", student_id))?;

        let name = required("Student name", &command.name)?;
        self.require_class(&command.class_id).await?;
        let guardian_ids = self.resolve_guardians(&command.guardian_emails, &name).await?;

        let student = Student {
            id: existing.id,
            name,
            class_id: command.class_id,
            guardian_ids,
        };
        self.student_repository.update_student(&student).await?;

        Ok(student)
    }

    pub async fn delete_student(&self, actor: &UserAccount, student_id: &str) -> ServiceResult<()> {
        require_manager(actor)?;
        info!("Deleting student {}", student_id);

        if !self.student_repository.delete_student(student_id).await? {
            return Err(not_found("Student", student_id));
        }
        Ok(())
    }

    pub async fn list_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.student_repository.list_students().await?)
    }

    pub async fn students_for_guardian(&self, guardian_id: &str) -> ServiceResult<Vec<Student>> {
        Ok(self.student_repository.list_students_for_guardian(guardian_id).await?)
    }

    // -- Classes ----------------------------------------------------------

    pub async fn create_class(&self, actor: &UserAccount, command: CreateClassCommand) -> ServiceResult<Class> {
        require_manager(actor)?;

        let name = required("Class name", &command.name)?;
        self.require_teacher(&command.teacher_id).await?;

        let class = Class {
            id: generate_id("class"),
            name,
            teacher_id: command.teacher_id,
        };
        self.class_repository.store_class(&class).await?;

        info!("Created class {} with ID: {}", class.name, class.id);
        Ok(class)
    }

    pub async fn reassign_class_teacher(
        &self,
        actor: &UserAccount,
        class_id: &str,
        teacher_id: &str,
    ) -> ServiceResult<Class> {
        require_manager(actor)?;

        let mut class = self.require_class(class_id).await?;
        self.require_teacher(teacher_id).await?;

        class.teacher_id = teacher_id.to_string();
        self.class_repository.update_class(&class).await?;

        info!("Class {} now taught by {}", class.id, class.teacher_id);
        Ok(class)
    }

    /// Remove an empty class
    pub async fn delete_class(&self, actor: &UserAccount, class_id: &str) -> ServiceResult<()> {
        require_manager(actor)?;

        self.require_class(class_id).await?;
        let enrolled = self.student_repository.list_students_in_class(class_id).await?;
        if !enrolled.is_empty() {
            return Err(ServiceError::Conflict(format!(
                "Class {} still has {} students",
                class_id,
                enrolled.len()
            )));
        }

        self.class_repository.delete_class(class_id).await?;
        info!("Deleted class {}", class_id);
        Ok(())
    }

    pub async fn list_classes(&self) -> ServiceResult<Vec<Class>> {
        Ok(self.class_repository.list_classes().await?)
    }

    pub async fn classes_for_teacher(&self, teacher_id: &str) -> ServiceResult<Vec<Class>> {
        Ok(self.class_repository.list_classes_for_teacher(teacher_id).await?)
    }

    // -- Users ------------------------------------------------------------

    /// Register a user with the placeholder password
    pub async fn create_user(&self, actor: &UserAccount, command: CreateUserCommand) -> ServiceResult<UserAccount> {
        require_manager(actor)?;

        let name = required("User name", &command.name)?;
        let email = validate_email(&command.email)?;
        if self.user_repository.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(format!("Email already registered: {}", email)));
        }

        let user = UserAccount {
            id: UserAccount::generate_id(),
            name,
            email,
            role: command.role,
            function: command
                .function
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
            password: self.placeholder_password.clone(),
        };
        self.user_repository.store_user(&user).await?;

        info!("Created {} {} with ID: {}", user.role, user.name, user.id);
        Ok(user)
    }

    /// Remove a user; managers cannot remove themselves and teachers must
    /// first hand over their classes
    pub async fn delete_user(&self, actor: &UserAccount, user_id: &str) -> ServiceResult<()> {
        require_manager(actor)?;

        if actor.id == user_id {
            return Err(ServiceError::Invalid("You cannot delete your own account".to_string()));
        }

        let owned = self.class_repository.list_classes_for_teacher(user_id).await?;
        if !owned.is_empty() {
            return Err(ServiceError::Conflict(format!(
                "User {} still teaches {} classes",
                user_id,
                owned.len()
            )));
        }

        if !self.user_repository.delete_user(user_id).await? {
            return Err(not_found("User", user_id));
        }

        info!("Deleted user {}", user_id);
        Ok(())
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<UserAccount>> {
        Ok(self.user_repository.list_users().await?)
    }

    // -- Helpers ----------------------------------------------------------

    async fn require_class(&self, class_id: &str) -> ServiceResult<Class> {
        self.class_repository
            .get_class(class_id)
            .await?
            .ok_or_else(|| not_found("Class", class_id))
    }

    async fn require_teacher(&self, teacher_id: &str) -> ServiceResult<UserAccount> {
        match self.user_repository.get_user(teacher_id).await? {
            Some(user) if user.role == UserRole::Teacher => Ok(user),
            Some(_) => Err(ServiceError::Invalid(format!("User {} is not a teacher", teacher_id))),
            None => Err(not_found("Teacher", teacher_id)),
        }
    }

    /// Resolve a comma-separated email list, dropping repeats
    async fn resolve_guardians(&self, emails: &str, student_name: &str) -> ServiceResult<Vec<String>> {
        // Reject the whole list before any guardian account is created
        let emails = emails
            .split(',')
            .filter(|e| !e.trim().is_empty())
            .map(validate_email)
            .collect::<ServiceResult<Vec<String>>>()?;

        let mut guardian_ids: Vec<String> = Vec::new();
        for email in &emails {
            let id = self.identity_resolver.resolve_guardian(email, student_name).await?;
            if !guardian_ids.contains(&id) {
                guardian_ids.push(id);
            }
        }

        if guardian_ids.is_empty() {
            return Err(ServiceError::Invalid(
                "At least one guardian email is required".to_string(),
            ));
        }
        Ok(guardian_ids)
    }
}

pub(crate) fn require_manager(actor: &UserAccount) -> ServiceResult<()> {
    if actor.is_manager() {
        Ok(())
    } else {
        warn!("User {} ({}) attempted a manager-only action", actor.id, actor.role);
        Err(ServiceError::Unauthorized("Only managers can do this".to_string()))
    }
}

pub(crate) fn required(label: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Invalid(format!("{} cannot be empty", label)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn not_found(kind: &str, id: &str) -> ServiceError {
    warn!("{} not found: {}", kind, id);
    ServiceError::NotFound(format!("{} not found: {}", kind, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::test_support::*;
    use crate::backend::storage::DbConnection;

    async fn create_test_service() -> (DirectoryService<DbConnection>, DbConnection) {
        let db = seeded_school().await;
        (DirectoryService::new(Arc::new(db.clone()), "123".to_string()), db)
    }

    fn enroll(name: &str, class_id: &str, emails: &str) -> EnrollStudentCommand {
        EnrollStudentCommand {
            name: name.to_string(),
            class_id: class_id.to_string(),
            guardian_emails: emails.to_string(),
        }
    }

    #[tokio::test]
    async fn test_enroll_resolves_and_deduplicates_guardians() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;

        let student = service
            .enroll_student(
                &manager,
                enroll("Bia", CLASS_ID, "family.lia@mail.com, NEW@mail.com,new@mail.com ,"),
            )
            .await
            .unwrap();

        assert_eq!(student.guardian_ids.len(), 2);
        assert_eq!(student.guardian_ids[0], GUARDIAN_ID);

        let created = db
            .create_user_repository()
            .get_user(&student.guardian_ids[1])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.name, "Family of Bia");

        let for_guardian = service.students_for_guardian(GUARDIAN_ID).await.unwrap();
        assert_eq!(for_guardian.len(), 2);
    }

    #[tokio::test]
    async fn test_enroll_requires_manager_class_and_guardian() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;
        let teacher = user(&db, TEACHER_ID).await;

        let result = service.enroll_student(&teacher, enroll("Bia", CLASS_ID, "a@b.com")).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));

        let result = service.enroll_student(&manager, enroll("Bia", "nope", "a@b.com")).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        let result = service.enroll_student(&manager, enroll("Bia", CLASS_ID, " , ")).await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));

        let result = service.enroll_student(&manager, enroll("  ", CLASS_ID, "a@b.com")).await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_enroll_with_bad_email_creates_no_guardians() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;

        let result = service
            .enroll_student(&manager, enroll("Bia", CLASS_ID, "fresh@mail.com, not-an-email"))
            .await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));

        assert_eq!(service.list_users().await.unwrap().len(), 4);
        let repo = db.create_user_repository();
        assert!(repo.find_user_by_email("fresh@mail.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_student_moves_class_and_replaces_guardians() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;

        let updated = service
            .update_student(&manager, STUDENT_ID, enroll("Lia S.", OTHER_CLASS_ID, "otto@school.com"))
            .await
            .unwrap();

        assert_eq!(updated.class_id, OTHER_CLASS_ID);
        assert_eq!(updated.guardian_ids, vec![OTHER_TEACHER_ID]);
        assert!(service.students_for_guardian(GUARDIAN_ID).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_class_rejected_while_students_remain() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;

        let result = service.delete_class(&manager, OTHER_CLASS_ID).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        service.delete_student(&manager, "s3").await.unwrap();
        service.delete_class(&manager, OTHER_CLASS_ID).await.unwrap();

        assert!(service.classes_for_teacher(OTHER_TEACHER_ID).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_reassign_class() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;

        let class = service
            .create_class(
                &manager,
                CreateClassCommand {
                    name: "Pre-school".to_string(),
                    teacher_id: TEACHER_ID.to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(service.classes_for_teacher(TEACHER_ID).await.unwrap().len(), 2);

        let moved = service
            .reassign_class_teacher(&manager, &class.id, OTHER_TEACHER_ID)
            .await
            .unwrap();
        assert_eq!(moved.teacher_id, OTHER_TEACHER_ID);

        let result = service.reassign_class_teacher(&manager, &class.id, GUARDIAN_ID).await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;
        let command = CreateUserCommand {
            name: "Carla".to_string(),
            email: "Carla@School.com".to_string(),
            role: UserRole::Teacher,
            function: Some(" Assistant ".to_string()),
        };

        let created = service.create_user(&manager, command.clone()).await.unwrap();
        assert_eq!(created.email, "carla@school.com");
        assert_eq!(created.function.as_deref(), Some("Assistant"));
        assert_eq!(created.password, "123");

        let result = service.create_user(&manager, command).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_user_rules() {
        let (service, db) = create_test_service().await;
        let manager = user(&db, MANAGER_ID).await;

        let result = service.delete_user(&manager, MANAGER_ID).await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));

        let result = service.delete_user(&manager, TEACHER_ID).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        service.delete_user(&manager, GUARDIAN_ID).await.unwrap();
        let result = service.delete_user(&manager, GUARDIAN_ID).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
