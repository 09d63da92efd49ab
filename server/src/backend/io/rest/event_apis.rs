//! # REST API for the School Calendar

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use shared::{CreateEventRequest, EventListResponse};
use tracing::{error, info};

use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::{ApiJson, ApiPath};
use crate::backend::AppState;

/// Upcoming and past events, earliest first; readable by everyone signed in
pub async fn list_events(State(state): State<AppState>, _caller: Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/events");

    let events = state.event_service.list_events().await?;
    Ok(Json(EventListResponse { events }))
}

pub async fn create_event(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> impl IntoResponse {
    info!("POST /api/events - {} on {}", request.title, request.date);

    match state.event_service.create_event(&actor, request).await {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(e) => {
            error!("Failed to create event: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_event(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(event_id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/events/{}", event_id);

    state.event_service.delete_event(&actor, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:event_id", delete(delete_event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::test_support::*;
    use crate::backend::io::rest::test_support::{send, setup_test_state};
    use axum::http::Method;
    use serde_json::json;

    async fn setup_test_app() -> Router {
        let (state, _db) = setup_test_state().await;
        router().with_state(state)
    }

    #[tokio::test]
    async fn test_manager_schedules_and_guardian_reads() {
        let app = setup_test_app().await;
        let party = json!({ "title": "June party", "date": "2024-06-21", "location": "Courtyard" });

        let (status, body) = send(&app, Method::POST, "/", Some(TEACHER_ID), Some(party.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");

        let (status, created) = send(&app, Method::POST, "/", Some(MANAGER_ID), Some(party)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["location"], "Courtyard");
        assert_eq!(created["description"], "");

        let meeting = json!({ "title": "Parents meeting", "date": "2024-05-15" });
        send(&app, Method::POST, "/", Some(MANAGER_ID), Some(meeting)).await;

        let (status, body) = send(&app, Method::GET, "/", Some(GUARDIAN_ID), None).await;
        assert_eq!(status, StatusCode::OK);
        let events = body["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["title"], "Parents meeting");
        assert_eq!(events[1]["title"], "June party");

        let uri = format!("/{}", created["id"].as_str().unwrap());
        let (status, _) = send(&app, Method::DELETE, &uri, Some(MANAGER_ID), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, Method::DELETE, &uri, Some(MANAGER_ID), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_rejects_incomplete_events() {
        let app = setup_test_app().await;

        let (status, body) = send(&app, Method::POST, "/", Some(MANAGER_ID), Some(json!({ "title": "", "date": "2024-05-15" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");

        let (status, body) = send(&app, Method::POST, "/", Some(MANAGER_ID), Some(json!({ "title": "Outing" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_BODY");

        let (status, _) = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
