//! # REST API Interface Layer
//!
//! HTTP endpoints of the school agenda, all served under `/api`.
//!
//! Handlers only translate: they extract the [`Caller`](caller::Caller),
//! hand typed commands to the domain services and map the results back to
//! the DTOs of the `shared` crate. Domain errors become
//! [`ApiError`](error::ApiError) responses with a stable `code`.
//!
//! Every endpoint except login, signup and client logging needs the
//! `x-user-id` header.

pub mod caller;
pub mod chat_apis;
pub mod directory_apis;
pub mod error;
pub mod event_apis;
pub mod extract;
pub mod feed_apis;
pub mod lesson_plan_apis;
pub mod logging_apis;
pub mod mappers;
pub mod menu_apis;
pub mod routine_apis;
pub mod session_apis;

use axum::Router;

use crate::backend::AppState;

/// All REST routes, relative to `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(routine_apis::router())
        .merge(directory_apis::router())
        .nest("/session", session_apis::router())
        .nest("/chat", chat_apis::router())
        .nest("/menus", menu_apis::router())
        .nest("/posts", feed_apis::router())
        .nest("/plans", lesson_plan_apis::router())
        .nest("/events", event_apis::router())
        .nest("/logs", logging_apis::router())
}
