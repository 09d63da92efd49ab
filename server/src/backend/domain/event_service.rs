//! The school calendar: dated events managers publish for every family.

use shared::{CreateEventRequest, SchoolEvent};
use std::sync::Arc;
use tracing::info;

use crate::backend::domain::directory_service::{not_found, require_manager, required};
use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::models::{canonical_date, generate_id};
use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::{Connection, EventStorage};

#[derive(Clone)]
pub struct EventService<C: Connection> {
    event_repository: C::EventRepository,
}

impl<C: Connection> EventService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            event_repository: connection.create_event_repository(),
        }
    }

    /// Title and date are required; description and location may be blank
    pub async fn create_event(&self, actor: &UserAccount, request: CreateEventRequest) -> ServiceResult<SchoolEvent> {
        require_manager(actor)?;

        let title = required("Title", &request.title)?;
        let date = canonical_date(&request.date)
            .ok_or_else(|| ServiceError::Invalid(format!("Invalid event date '{}'", request.date)))?;

        let event = SchoolEvent {
            id: generate_id("event"),
            title,
            date,
            description: request.description.trim().to_string(),
            location: request.location.trim().to_string(),
        };
        self.event_repository.store_event(&event).await?;

        info!("Event {} scheduled for {} by {}", event.id, event.date, actor.id);
        Ok(event)
    }

    /// Every event, earliest first
    pub async fn list_events(&self) -> ServiceResult<Vec<SchoolEvent>> {
        Ok(self.event_repository.list_events().await?)
    }

    pub async fn delete_event(&self, actor: &UserAccount, event_id: &str) -> ServiceResult<()> {
        require_manager(actor)?;

        if !self.event_repository.delete_event(event_id).await? {
            return Err(not_found("Event", event_id));
        }
        info!("Event {} deleted by {}", event_id, actor.id);
        Ok(())
    }
}
