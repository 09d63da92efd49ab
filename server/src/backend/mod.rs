//! # Backend Module
//!
//! Everything behind the HTTP port of the school agenda:
//!
//! ```text
//! IO Layer (REST API, Gemini client)
//!     ↓
//! Domain Layer (routine ledger, directory, chat, menu, mural, plans, calendar)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```
//!
//! [`initialize_backend`] wires the services over one database pool and
//! [`create_router`] mounts the REST API under `/api`.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::backend::config::AppConfig;
use crate::backend::domain::{
    ChatService, DirectoryService, EventService, FeedService, LessonPlanService, MenuService,
    RoutineLedger, SessionService, SummaryService, TextGenerator,
};
use crate::backend::io::gemini_client::GeminiClient;
use crate::backend::io::rest::{api_router, caller::USER_ID_HEADER};
use crate::backend::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub routine_ledger: RoutineLedger<DbConnection>,
    pub directory_service: DirectoryService<DbConnection>,
    pub session_service: SessionService<DbConnection>,
    pub chat_service: ChatService<DbConnection>,
    pub menu_service: MenuService<DbConnection>,
    pub feed_service: FeedService<DbConnection>,
    pub lesson_plan_service: LessonPlanService<DbConnection>,
    pub event_service: EventService<DbConnection>,
    pub summary_service: SummaryService,
}

impl AppState {
    pub fn new(db: Arc<DbConnection>, config: &AppConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            routine_ledger: RoutineLedger::new(db.clone()),
            directory_service: DirectoryService::new(db.clone(), config.guardian_password.clone()),
            session_service: SessionService::new(db.clone()),
            chat_service: ChatService::new(db.clone()),
            menu_service: MenuService::new(db.clone()),
            feed_service: FeedService::new(db.clone()),
            lesson_plan_service: LessonPlanService::new(db.clone()),
            event_service: EventService::new(db),
            summary_service: SummaryService::new(generator),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url, config.max_db_connections)
        .await
        .context("Failed to open the database")?;

    let generator: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            info!("Observation drafts use model {}", config.summary_model);
            let client = GeminiClient::new(key.clone(), config.summary_model.clone())
                .context("Failed to build the Gemini client")?;
            Some(Arc::new(client))
        }
        None => None,
    };

    info!("Setting up application state");
    Ok(AppState::new(Arc::new(db), config, generator))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => warn!("Ignoring unusable CORS origin '{}'", cors_origin),
    }

    Router::new()
        .nest("/api", api_router())
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_routes_are_mounted_under_api() {
        let db = seeded_school().await;
        let state = AppState::new(Arc::new(db), &AppConfig::default(), None);
        let app = create_router(state, "http://localhost:8080");

        let request = Request::builder()
            .uri("/api/session/me")
            .header(USER_ID_HEADER, MANAGER_ID)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/api/events")
            .header(USER_ID_HEADER, GUARDIAN_ID)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder().uri("/session/me").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preflight_allows_caller_header() {
        let db = seeded_school().await;
        let state = AppState::new(Arc::new(db), &AppConfig::default(), None);
        let app = create_router(state, "http://localhost:8080");

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/menus")
            .header(header::ORIGIN, "http://localhost:8080")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, USER_ID_HEADER)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:8080"
        );
    }
}
