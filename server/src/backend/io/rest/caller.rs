//! Identification of the user behind a request.
//!
//! Clients send the id returned at login in the `x-user-id` header on every
//! call. This is a thin credential check, not a security boundary.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::backend::domain::models::user::UserAccount;
use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The resolved user making the request
#[derive(Debug, Clone)]
pub struct Caller(pub UserAccount);

impl Caller {
    pub fn require_staff(&self) -> Result<&UserAccount, ApiError> {
        if self.0.is_staff() {
            Ok(&self.0)
        } else {
            Err(ApiError::forbidden("Only school staff can do this"))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthenticated("Missing x-user-id header"))?;

        match state.session_service.resolve_caller(user_id).await? {
            Some(user) => Ok(Caller(user)),
            None => Err(ApiError::unauthenticated(format!("Unknown user: {}", user_id))),
        }
    }
}
