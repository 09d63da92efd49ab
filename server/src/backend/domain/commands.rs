//! Domain-level command and result types.
//!
//! Services take these instead of the public DTOs from `shared`; the REST
//! layer maps between the two.

pub mod routines {
    use crate::backend::domain::models::routine::RoutineRecord;
    use shared::{RoutineFields, UpsertOutcome};

    /// Candidate values for one student on one day
    #[derive(Debug, Clone)]
    pub struct SubmitRoutineCommand {
        pub student_id: String,
        /// Raw calendar date as supplied by the caller
        pub date: String,
        pub fields: RoutineFields,
        pub author_id: String,
    }

    #[derive(Debug, Clone)]
    pub struct SubmitRoutineResult {
        pub routine: RoutineRecord,
        pub outcome: UpsertOutcome,
    }

    /// Values an editing form starts from
    #[derive(Debug, Clone)]
    pub struct RoutineForm {
        pub student_id: String,
        pub date: String,
        pub existing: Option<RoutineRecord>,
        pub fields: RoutineFields,
    }

    #[derive(Debug, Clone)]
    pub struct StudentRoutineStatus {
        pub student_id: String,
        pub student_name: String,
        pub has_routine: bool,
    }
}

pub mod directory {
    use shared::UserRole;

    #[derive(Debug, Clone)]
    pub struct EnrollStudentCommand {
        pub name: String,
        pub class_id: String,
        /// Comma-separated guardian emails
        pub guardian_emails: String,
    }

    #[derive(Debug, Clone)]
    pub struct CreateUserCommand {
        pub name: String,
        pub email: String,
        pub role: UserRole,
        pub function: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateClassCommand {
        pub name: String,
        pub teacher_id: String,
    }
}

pub mod session {
    use shared::UserRole;

    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
        pub role: UserRole,
    }

    #[derive(Debug, Clone)]
    pub struct SignupCommand {
        pub name: String,
        pub email: String,
        pub password: String,
    }
}
