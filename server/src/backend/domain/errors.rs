//! Typed failures of the domain services.

use thiserror::Error;

/// Failures of the routine ledger. All are terminal for the call that
/// raised them; nothing is retried.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("User {0} may not access routines of this student")]
    Unauthorized(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Failed to persist routine: {0}")]
    PersistenceFailure(#[from] anyhow::Error),
}

/// Failures of the directory, session, chat, menu, mural and lesson plan
/// services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email, password or profile")]
    InvalidCredentials,

    #[error("Storage failure: {0}")]
    Persistence(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
