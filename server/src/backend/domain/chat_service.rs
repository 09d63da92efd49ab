//! Direct messaging between families and staff, limited to opening hours.

use chrono::{Local, Timelike, Utc};
use shared::{ChatConfig, ChatMessage, SendMessageRequest, UserRole};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::directory_service::{not_found, require_manager};
use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::models::generate_id;
use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::{ChatStorage, Connection, UserStorage};

/// Whether a user with `role` may chat at `hour` (0-23, local time)
///
/// Managers are never restricted.
pub fn chat_open_for(role: UserRole, config: &ChatConfig, hour: u32) -> bool {
    match role {
        UserRole::Manager => true,
        _ => config.is_enabled && config.start_hour <= hour && hour < config.end_hour,
    }
}

#[derive(Clone)]
pub struct ChatService<C: Connection> {
    chat_repository: C::ChatRepository,
    user_repository: C::UserRepository,
}

impl<C: Connection> ChatService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            chat_repository: connection.create_chat_repository(),
            user_repository: connection.create_user_repository(),
        }
    }

    /// The stored opening hours, or the defaults when never saved
    pub async fn get_config(&self) -> ServiceResult<ChatConfig> {
        Ok(self.chat_repository.get_chat_config().await?.unwrap_or_default())
    }

    pub async fn update_config(&self, actor: &UserAccount, config: ChatConfig) -> ServiceResult<ChatConfig> {
        require_manager(actor)?;

        if config.end_hour > 24 || config.start_hour >= config.end_hour {
            return Err(ServiceError::Invalid(format!(
                "Chat hours must satisfy 0 <= start < end <= 24, got {}-{}",
                config.start_hour, config.end_hour
            )));
        }

        self.chat_repository.set_chat_config(&config).await?;
        info!(
            "Chat hours set to {}-{} (enabled: {})",
            config.start_hour, config.end_hour, config.is_enabled
        );
        Ok(config)
    }

    pub async fn is_open_for(&self, user: &UserAccount) -> ServiceResult<bool> {
        self.is_open_at(user, current_hour()).await
    }

    pub async fn is_open_at(&self, user: &UserAccount, hour: u32) -> ServiceResult<bool> {
        let config = self.get_config().await?;
        Ok(chat_open_for(user.role, &config, hour))
    }

    /// Users this user may write to: guardians reach staff, staff reach
    /// everybody else
    pub async fn contacts(&self, user: &UserAccount) -> ServiceResult<Vec<UserAccount>> {
        let everyone = self.user_repository.list_users().await?;

        Ok(everyone
            .into_iter()
            .filter(|other| other.id != user.id)
            .filter(|other| match user.role {
                UserRole::Guardian => other.is_staff(),
                UserRole::Manager | UserRole::Teacher => true,
            })
            .collect())
    }

    pub async fn send_message(&self, sender: &UserAccount, request: SendMessageRequest) -> ServiceResult<ChatMessage> {
        self.send_message_at(sender, request, current_hour()).await
    }

    pub async fn send_message_at(
        &self,
        sender: &UserAccount,
        request: SendMessageRequest,
        hour: u32,
    ) -> ServiceResult<ChatMessage> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(ServiceError::Invalid("Message cannot be empty".to_string()));
        }

        if !self.is_open_at(sender, hour).await? {
            warn!("Chat closed for {} at hour {}", sender.id, hour);
            return Err(ServiceError::Unauthorized("Chat is closed at this time".to_string()));
        }

        let receiver = self
            .user_repository
            .get_user(&request.receiver_id)
            .await?
            .ok_or_else(|| not_found("User", &request.receiver_id))?;

        let reachable = self.contacts(sender).await?.iter().any(|c| c.id == receiver.id);
        if !reachable {
            return Err(ServiceError::Unauthorized(format!(
                "{} cannot message {}",
                sender.id, receiver.id
            )));
        }

        let message = ChatMessage {
            id: generate_id("message"),
            sender_id: sender.id.clone(),
            receiver_id: receiver.id,
            content: content.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        self.chat_repository.store_message(&message).await?;

        info!("Message {} from {} to {}", message.id, message.sender_id, message.receiver_id);
        Ok(message)
    }

    /// Both directions between the user and `other_id`, oldest first
    pub async fn conversation(&self, user: &UserAccount, other_id: &str) -> ServiceResult<Vec<ChatMessage>> {
        Ok(self.chat_repository.list_conversation(&user.id, other_id).await?)
    }
}

fn current_hour() -> u32 {
    Local::now().hour()
}
