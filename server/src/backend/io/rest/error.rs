//! Translation of domain failures into HTTP responses.
//!
//! Every error body has the shape `{ "error": message, "code": CODE }`.
//! Storage failures are reported without their internal details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use shared::ErrorResponse;
use tracing::error;

use crate::backend::domain::{LedgerError, ServiceError};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// No caller, or a caller id nobody owns
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", message)
    }

    /// A known caller without the required role
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILURE", "Internal server error")
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::StudentNotFound(_) => Self::not_found("STUDENT_NOT_FOUND", message),
            LedgerError::Unauthorized(_) => Self::forbidden(message),
            LedgerError::InvalidDate(_) => Self::new(StatusCode::BAD_REQUEST, "INVALID_DATE", message),
            LedgerError::PersistenceFailure(e) => {
                error!("Routine storage failure: {:#}", e);
                Self::internal()
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => Self::not_found("NOT_FOUND", message),
            ServiceError::Unauthorized(message) => Self::forbidden(message),
            ServiceError::Invalid(message) => Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
            ServiceError::Conflict(message) => Self::new(StatusCode::CONFLICT, "CONFLICT", message),
            ServiceError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                ServiceError::InvalidCredentials.to_string(),
            ),
            ServiceError::Persistence(e) => {
                error!("Storage failure: {:#}", e);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
