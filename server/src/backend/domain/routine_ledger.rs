//! # Routine Ledger
//!
//! Owns the daily routine records: at most one record per (student, date).
//! Submitting for a pair that already has a record replaces every field and
//! the author; there is no merge and no conflict detection, so the last
//! writer wins.
//!
//! Records of absent students keep whatever care values were submitted.
//! Suppressing them is the guardian view's job, see
//! [`RoutineMapper::to_guardian_view`](crate::backend::io::rest::mappers::routine_mapper::RoutineMapper::to_guardian_view).

use chrono::{NaiveDate, Utc};
use shared::{RoutineFields, Student, UpsertOutcome, UserRole};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::commands::routines::{
    RoutineForm, StudentRoutineStatus, SubmitRoutineCommand, SubmitRoutineResult,
};
use crate::backend::domain::errors::LedgerError;
use crate::backend::domain::models::{self, routine::RoutineRecord};
use crate::backend::storage::{ClassStorage, Connection, RoutineStorage, StudentStorage, UserStorage};

#[derive(Clone)]
pub struct RoutineLedger<C: Connection> {
    routine_repository: C::RoutineRepository,
    student_repository: C::StudentRepository,
    class_repository: C::ClassRepository,
    user_repository: C::UserRepository,
}

impl<C: Connection> RoutineLedger<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            routine_repository: connection.create_routine_repository(),
            student_repository: connection.create_student_repository(),
            class_repository: connection.create_class_repository(),
            user_repository: connection.create_user_repository(),
        }
    }

    /// Create or fully replace the record for (student, date)
    ///
    /// Checks run in order: date format, student existence, author
    /// permission. Nothing is written unless all of them pass.
    pub async fn submit_routine(
        &self,
        command: SubmitRoutineCommand,
    ) -> Result<SubmitRoutineResult, LedgerError> {
        info!(
            "Submitting routine: student={}, date={}, author={}",
            command.student_id, command.date, command.author_id
        );

        let date = parse_date(&command.date)?;
        let student = self.require_student(&command.student_id).await?;
        self.authorize_writer(&command.author_id, &student).await?;

        let candidate = RoutineRecord {
            id: RoutineRecord::generate_id(),
            student_id: student.id,
            date,
            fields: command.fields,
            author_id: command.author_id,
            updated_at: Utc::now(),
        };

        let stored_id = self.routine_repository.upsert_routine(&candidate).await?;
        let outcome = if stored_id == candidate.id {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Replaced
        };

        info!(
            "Routine {} for student {} on {} ({:?})",
            stored_id, candidate.student_id, command.date, outcome
        );

        Ok(SubmitRoutineResult {
            routine: RoutineRecord {
                id: stored_id,
                ..candidate
            },
            outcome,
        })
    }

    /// Pure lookup of the record for (student, date)
    pub async fn load_routine(
        &self,
        student_id: &str,
        date: &str,
    ) -> Result<Option<RoutineRecord>, LedgerError> {
        let date = parse_date(date)?;
        let record = self.routine_repository.get_routine(student_id, date).await?;

        if record.is_none() {
            info!("No routine for student {} on {}", student_id, date);
        }

        Ok(record)
    }

    /// The values an editing form should start from: the stored record when
    /// one exists, otherwise the blank-form defaults
    pub async fn prepare_routine_form(
        &self,
        student_id: &str,
        date: &str,
    ) -> Result<RoutineForm, LedgerError> {
        let parsed = parse_date(date)?;
        let student = self.require_student(student_id).await?;
        let existing = self.routine_repository.get_routine(&student.id, parsed).await?;

        let fields = existing
            .as_ref()
            .map(|record| record.fields.clone())
            .unwrap_or_else(RoutineFields::default);

        Ok(RoutineForm {
            student_id: student.id,
            date: models::format_date(parsed),
            existing,
            fields,
        })
    }

    /// Every record of a student, newest first
    pub async fn list_student_routines(&self, student_id: &str) -> Result<Vec<RoutineRecord>, LedgerError> {
        let routines = self.routine_repository.list_routines_for_student(student_id).await?;
        info!("Found {} routines for student {}", routines.len(), student_id);
        Ok(routines)
    }

    /// Whether each student of a class already has a record for the day
    pub async fn routine_status_for_class(
        &self,
        class_id: &str,
        date: &str,
    ) -> Result<Vec<StudentRoutineStatus>, LedgerError> {
        let date = parse_date(date)?;
        let students = self.student_repository.list_students_in_class(class_id).await?;
        let recorded: HashSet<String> = self
            .routine_repository
            .list_student_ids_with_routine(date)
            .await?
            .into_iter()
            .collect();

        Ok(students
            .into_iter()
            .map(|student| StudentRoutineStatus {
                has_routine: recorded.contains(&student.id),
                student_id: student.id,
                student_name: student.name,
            })
            .collect())
    }

    /// Records of a student as read by one of its guardians, newest first
    pub async fn guardian_routines(
        &self,
        guardian_id: &str,
        student_id: &str,
    ) -> Result<Vec<RoutineRecord>, LedgerError> {
        let student = self.require_student(student_id).await?;

        if !student.guardian_ids.iter().any(|id| id == guardian_id) {
            warn!("Guardian {} is not linked to student {}", guardian_id, student_id);
            return Err(LedgerError::Unauthorized(guardian_id.to_string()));
        }

        Ok(self.routine_repository.list_routines_for_student(&student.id).await?)
    }

    async fn require_student(&self, student_id: &str) -> Result<Student, LedgerError> {
        match self.student_repository.get_student(student_id).await? {
            Some(student) => Ok(student),
            None => {
                warn!("Student not found: {}", student_id);
                Err(LedgerError::StudentNotFound(student_id.to_string()))
            }
        }
    }

    /// Managers may write any record; teachers only for students of their
    /// own class
    async fn authorize_writer(&self, author_id: &str, student: &Student) -> Result<(), LedgerError> {
        let denied = || {
            warn!("User {} may not record routines for student {}", author_id, student.id);
            LedgerError::Unauthorized(author_id.to_string())
        };

        let author = self.user_repository.get_user(author_id).await?.ok_or_else(denied)?;

        match author.role {
            UserRole::Manager => Ok(()),
            UserRole::Teacher => {
                let class = self.class_repository.get_class(&student.class_id).await?;
                match class {
                    Some(class) if class.teacher_id == author.id => Ok(()),
                    _ => Err(denied()),
                }
            }
            UserRole::Guardian => Err(denied()),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    models::parse_date(raw).ok_or_else(|| LedgerError::InvalidDate(raw.to_string()))
}
