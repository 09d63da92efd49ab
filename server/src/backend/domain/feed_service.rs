//! The school mural: announcements by staff, liked by anyone.

use chrono::Utc;
use shared::{CreatePostRequest, FeedPost};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::directory_service::{not_found, required};
use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::models::generate_id;
use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::{Connection, PostStorage};

#[derive(Clone)]
pub struct FeedService<C: Connection> {
    post_repository: C::PostRepository,
}

impl<C: Connection> FeedService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            post_repository: connection.create_post_repository(),
        }
    }

    pub async fn create_post(&self, author: &UserAccount, request: CreatePostRequest) -> ServiceResult<FeedPost> {
        if !author.is_staff() {
            warn!("Guardian {} attempted to post on the mural", author.id);
            return Err(ServiceError::Unauthorized("Only staff can post on the mural".to_string()));
        }

        let post = FeedPost {
            id: generate_id("post"),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            author_role: author.role,
            title: required("Title", &request.title)?,
            content: required("Content", &request.content)?,
            kind: request.kind,
            attachments: request.attachments,
            likes: Vec::new(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.post_repository.store_post(&post).await?;

        info!("Published {} post {} by {}", post.kind, post.id, post.author_id);
        Ok(post)
    }

    /// Add the user's like, or remove it when already present
    pub async fn toggle_like(&self, user: &UserAccount, post_id: &str) -> ServiceResult<FeedPost> {
        let mut post = self
            .post_repository
            .get_post(post_id)
            .await?
            .ok_or_else(|| not_found("Post", post_id))?;

        match post.likes.iter().position(|id| id == &user.id) {
            Some(index) => {
                post.likes.remove(index);
            }
            None => post.likes.push(user.id.clone()),
        }
        self.post_repository.update_likes(&post.id, &post.likes).await?;

        Ok(post)
    }

    pub async fn list_posts(&self) -> ServiceResult<Vec<FeedPost>> {
        Ok(self.post_repository.list_posts().await?)
    }
}
