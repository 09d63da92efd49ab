//! # REST API for the School Mural

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{CreatePostRequest, FeedPost, PostListResponse};
use tracing::{error, info};

use crate::backend::io::rest::caller::Caller;
use crate::backend::io::rest::error::ApiError;
use crate::backend::io::rest::extract::{ApiJson, ApiPath};
use crate::backend::AppState;

pub async fn list_posts(State(state): State<AppState>, _caller: Caller) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/posts");

    let posts = state.feed_service.list_posts().await?;
    Ok(Json(PostListResponse { posts }))
}

pub async fn create_post(
    State(state): State<AppState>,
    Caller(author): Caller,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> impl IntoResponse {
    info!("POST /api/posts - {} by {}", request.kind, author.id);

    match state.feed_service.create_post(&author, request).await {
        Ok(post) => (StatusCode::CREATED, Json(post)).into_response(),
        Err(e) => {
            error!("Failed to create post: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Like the post, or take the like back
pub async fn toggle_like(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiPath(post_id): ApiPath<String>,
) -> Result<Json<FeedPost>, ApiError> {
    info!("POST /api/posts/{}/like by {}", post_id, user.id);
    Ok(Json(state.feed_service.toggle_like(&user, &post_id).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:post_id/like", post(toggle_like))
}
