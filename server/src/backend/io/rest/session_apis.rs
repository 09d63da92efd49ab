//! # REST API for Sessions
//!
//! Login returns the user whose `id` the client then sends as `x-user-id`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{LoginRequest, SessionResponse, SignupRequest};
use tracing::{error, info};

use crate::backend::domain::commands::session::{LoginCommand, SignupCommand};
use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::ApiJson;
use crate::backend::io::rest::mappers::user_mapper::UserMapper;
use crate::backend::AppState;

pub async fn login(State(state): State<AppState>, ApiJson(request): ApiJson<LoginRequest>) -> impl IntoResponse {
    info!("POST /api/session/login - {} as {}", request.email, request.role);

    let command = LoginCommand {
        email: request.email,
        password: request.password,
        role: request.role,
    };

    match state.session_service.login(command).await {
        Ok(user) => (StatusCode::OK, Json(SessionResponse { user: UserMapper::to_dto(user) })).into_response(),
        Err(e) => {
            error!("Login failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Register the manager of a new school
pub async fn signup(State(state): State<AppState>, ApiJson(request): ApiJson<SignupRequest>) -> impl IntoResponse {
    info!("POST /api/session/signup - {}", request.email);

    let command = SignupCommand {
        name: request.name,
        email: request.email,
        password: request.password,
    };

    match state.session_service.signup_manager(command).await {
        Ok(user) => (StatusCode::CREATED, Json(SessionResponse { user: UserMapper::to_dto(user) })).into_response(),
        Err(e) => {
            error!("Signup failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// The user behind the `x-user-id` header
pub async fn current_user(Caller(user): Caller) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: UserMapper::to_dto(user),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/me", get(current_user))
}
