//! # REST API for Direct Messages

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{ChatConfig, ChatContactsResponse, ConversationResponse, SendMessageRequest};
use tracing::{error, info};

use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::{ApiJson, ApiPath};
use crate::backend::io::rest::mappers::user_mapper::UserMapper;
use crate::backend::AppState;

pub async fn get_config(State(state): State<AppState>, _caller: Caller) -> Result<Json<ChatConfig>, ApiError> {
    info!("GET /api/chat/config");
    Ok(Json(state.chat_service.get_config().await?))
}

pub async fn update_config(
    State(state): State<AppState>,
    Caller(actor): Caller,
    ApiJson(config): ApiJson<ChatConfig>,
) -> Result<Json<ChatConfig>, ApiError> {
    info!("PUT /api/chat/config - {:?}", config);
    Ok(Json(state.chat_service.update_config(&actor, config).await?))
}

/// People the caller may write to, and whether the chat is open right now
pub async fn contacts(State(state): State<AppState>, Caller(user): Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/chat/contacts for {}", user.id);

    let contacts = state.chat_service.contacts(&user).await?;
    let chat_open = state.chat_service.is_open_for(&user).await?;
    Ok(Json(ChatContactsResponse {
        contacts: contacts.into_iter().map(UserMapper::to_dto).collect(),
        chat_open,
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    Caller(sender): Caller,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> impl IntoResponse {
    info!("POST /api/chat/messages from {} to {}", sender.id, request.receiver_id);

    match state.chat_service.send_message(&sender, request).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => {
            error!("Failed to send message: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn conversation(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiPath(other_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/chat/messages/{} for {}", other_id, user.id);

    let messages = state.chat_service.conversation(&user, &other_id).await?;
    Ok(Json(ConversationResponse { messages }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/config", get(get_config).put(update_config))
        .route("/contacts", get(contacts))
        .route("/messages", post(send_message))
        .route("/messages/:other_id", get(conversation))
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
    async fn test_round_the_clock_conversation() {
        let app = setup_test_app().await;
        let always_open = json!({ "start_hour": 0, "end_hour": 24, "is_enabled": true });

        let (status, _) = send(&app, Method::PUT, "/config", Some(TEACHER_ID), Some(always_open.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, Method::PUT, "/config", Some(MANAGER_ID), Some(always_open)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/contacts", Some(GUARDIAN_ID), None).await;
        assert_eq!(body["chat_open"], true);
        assert_eq!(body["contacts"].as_array().unwrap().len(), 3);

        let (status, body) = send(
            &app,
            Method::POST,
            "/messages",
            Some(GUARDIAN_ID),
            Some(json!({ "receiver_id": TEACHER_ID, "content": "Did Lia nap?" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["sender_id"], GUARDIAN_ID);

        let (_, body) = send(&app, Method::GET, &format!("/messages/{}", GUARDIAN_ID), Some(TEACHER_ID), None).await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["content"], "Did Lia nap?");
    }

    #[tokio::test]
    async fn test_disabled_chat_blocks_guardians() {
        let app = setup_test_app().await;
        let disabled = json!({ "start_hour": 8, "end_hour": 18, "is_enabled": false });
        send(&app, Method::PUT, "/config", Some(MANAGER_ID), Some(disabled)).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/messages",
            Some(GUARDIAN_ID),
            Some(json!({ "receiver_id": TEACHER_ID, "content": "Hello" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }
}
