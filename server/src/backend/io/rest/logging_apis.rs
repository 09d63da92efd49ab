//! Relay of client-side log lines into the server log.

use axum::{http::StatusCode, response::Json, routing::post, Router};
use serde::Serialize;
use shared::LogEntry;
use tracing::{debug, error, info, warn};

use crate::backend::io::rest::extract::ApiJson;
use crate::backend::AppState;

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub success: bool,
}

pub async fn log_message(ApiJson(entry): ApiJson<LogEntry>) -> Result<Json<LogResponse>, StatusCode> {
    let component = entry.component.as_deref().unwrap_or("frontend");
    let message = format!("[{}] {}", component, entry.message);

    match entry.level.to_lowercase().as_str() {
        "debug" => debug!(target: "client", "{}", message),
        "warn" => warn!(target: "client", "{}", message),
        "error" => error!(target: "client", "{}", message),
        _ => info!(target: "client", "{}", message),
    }

    Ok(Json(LogResponse { success: true }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(log_message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::io::rest::test_support::{send, setup_test_state};
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_log_without_caller() {
        let (state, _db) = setup_test_state().await;
        let app = router().with_state(state);

        let (status, body) = send(
            &app,
            Method::POST,
            "/",
            None,
            Some(json!({ "level": "warn", "message": "Slow render", "component": "agenda" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
