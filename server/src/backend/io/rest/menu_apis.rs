//! # REST API for the School Menu

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use shared::{DayMenu, MenuListResponse};
use tracing::{error, info};

use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::{ApiJson, ApiPath};
use crate::backend::AppState;

/// Menus of every day, newest first; readable by everyone signed in
pub async fn list_menus(State(state): State<AppState>, _caller: Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/menus");

    let menus = state.menu_service.list_menus().await?;
    Ok(Json(MenuListResponse { menus }))
}

pub async fn save_menu(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiJson(menu): ApiJson<DayMenu>,
) -> impl IntoResponse {
    info!("POST /api/menus - {}", menu.date);

    match state.menu_service.save_day_menu(&actor, menu).await {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(e) => {
            error!("Failed to save menu: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_menu(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiPath(date): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/menus/{}", date);

    state.menu_service.delete_day_menu(&actor, &date).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menus).post(save_menu))
        .route("/:date", delete(delete_menu))
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
    async fn test_manager_publishes_and_guardian_reads() {
        let app = setup_test_app().await;
        let menu = json!({ "date": "2024-05-10", "lunch": "Rice, beans and carrots" });

        let (status, _) = send(&app, Method::POST, "/", Some(TEACHER_ID), Some(menu.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, Method::POST, "/", Some(MANAGER_ID), Some(menu)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lunch"], "Rice, beans and carrots");

        let (status, body) = send(&app, Method::GET, "/", Some(GUARDIAN_ID), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["menus"][0]["date"], "2024-05-10");

        let (status, _) = send(&app, Method::DELETE, "/2024-05-10", Some(MANAGER_ID), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, "/2024-05-10", Some(MANAGER_ID), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
