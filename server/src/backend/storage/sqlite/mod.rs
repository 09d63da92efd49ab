//! # SQLite Storage Module
//!
//! SQLite-backed implementations of the storage traits.
//!
//! - **connection.rs** - pool management, schema and the [`Connection`] factory
//! - **repositories/** - one repository per table group
//!
//! [`Connection`]: crate::backend::storage::Connection

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    ChatRepository, ClassRepository, EventRepository, LessonPlanRepository, MenuRepository,
    PostRepository, RoutineRepository, StudentRepository, UserRepository,
};
