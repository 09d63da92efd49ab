//! # Storage Module
//!
//! Handles all data persistence for the agenda server.
//!
//! The domain layer depends only on the traits in [`traits`]; a
//! [`Connection`] hands out one repository per table. The only backend is
//! SQLite through sqlx.
//!
//! ## Tables
//!
//! - **users**, **classes**, **students**, **student_guardians**: the school directory
//! - **routines**: one row per (student, day), upserted by natural key
//! - **messages**, **chat_config**: direct messaging
//! - **menu_entries**: one row per (day, meal)
//! - **posts**: the school mural
//! - **lesson_plans**: teacher plans awaiting or holding manager approval
//! - **events**: the school calendar

pub mod sqlite;
pub mod traits;

pub use sqlite::DbConnection;
pub use traits::*;
