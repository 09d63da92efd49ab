//! # Domain Module
//!
//! Business rules of the school agenda, independent of HTTP and of the
//! storage backend. Services are generic over a storage
//! [`Connection`](crate::backend::storage::Connection) and create the
//! repositories they need from it.
//!
//! ## Services
//!
//! - **routine_ledger**: daily routine records, one per student and day
//! - **identity_resolver**: find-or-create of guardian accounts by email
//! - **directory_service**: users, classes and student enrollment
//! - **session_service**: login, manager signup and caller resolution
//! - **summary_service**: suggested observation text with a fixed fallback
//! - **chat_service**: direct messages within opening hours
//! - **menu_service**: the school menu per day and meal
//! - **feed_service**: the school mural
//! - **lesson_plan_service**: lesson plans and their approval
//! - **event_service**: the school calendar
//!
//! ## Rules worth knowing
//!
//! - A routine submission replaces the whole stored record; callers that
//!   want partial edits read the form values first.
//! - Care fields of absent students are stored as submitted and hidden only
//!   when presented to guardians.
//! - Only managers change the directory, the menu, the calendar and the
//!   chat hours.

pub mod chat_service;
pub mod commands;
pub mod directory_service;
pub mod errors;
pub mod event_service;
pub mod feed_service;
pub mod identity_resolver;
pub mod lesson_plan_service;
pub mod menu_service;
pub mod models;
pub mod routine_ledger;
pub mod session_service;
pub mod summary_service;

#[cfg(test)]
pub mod test_support;

pub use chat_service::ChatService;
pub use directory_service::DirectoryService;
pub use errors::{LedgerError, ServiceError, ServiceResult};
pub use event_service::EventService;
pub use feed_service::FeedService;
pub use identity_resolver::IdentityResolver;
pub use lesson_plan_service::LessonPlanService;
pub use menu_service::MenuService;
pub use routine_ledger::RoutineLedger;
pub use session_service::SessionService;
pub use summary_service::{SummaryService, TextGenerator};
