//! SQLite repositories, one per table group.

pub mod chat_repository;
pub mod class_repository;
pub mod event_repository;
pub mod lesson_plan_repository;
pub mod menu_repository;
pub mod post_repository;
pub mod routine_repository;
pub mod student_repository;
pub mod user_repository;

pub use chat_repository::ChatRepository;
pub use class_repository::ClassRepository;
pub use event_repository::EventRepository;
pub use lesson_plan_repository::LessonPlanRepository;
pub use menu_repository::MenuRepository;
pub use post_repository::PostRepository;
pub use routine_repository::RoutineRepository;
pub use student_repository::StudentRepository;
pub use user_repository::UserRepository;

use anyhow::{Context, Result};
use shared::UnknownVariant;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

/// Read a text column holding one of the closed vocabularies
pub(crate) fn vocabulary_column<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>()
        .with_context(|| format!("Corrupt value in column '{}'", column))
}
