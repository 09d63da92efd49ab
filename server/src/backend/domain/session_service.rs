//! Thin credential check and caller resolution.

use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::commands::session::{LoginCommand, SignupCommand};
use crate::backend::domain::directory_service::required;
use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::identity_resolver::validate_email;
use crate::backend::domain::models::user::{normalize_email, UserAccount};
use crate::backend::storage::{Connection, UserStorage};
use shared::UserRole;

#[derive(Clone)]
pub struct SessionService<C: Connection> {
    user_repository: C::UserRepository,
}

impl<C: Connection> SessionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
        }
    }

    /// Check email, password and the profile the user picked
    ///
    /// Every mismatch yields the same `InvalidCredentials` error.
    pub async fn login(&self, command: LoginCommand) -> ServiceResult<UserAccount> {
        let email = normalize_email(&command.email);
        info!("Login attempt for {} as {}", email, command.role);

        match self.user_repository.find_user_by_email(&email).await? {
            Some(user) if user.password == command.password && user.role == command.role => {
                info!("User {} logged in", user.id);
                Ok(user)
            }
            _ => {
                warn!("Rejected login for {}", email);
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Register the manager account of a new school
    pub async fn signup_manager(&self, command: SignupCommand) -> ServiceResult<UserAccount> {
        let name = required("Name", &command.name)?;
        let email = validate_email(&command.email)?;
        if command.password.is_empty() {
            return Err(ServiceError::Invalid("Password cannot be empty".to_string()));
        }

        if self.user_repository.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(format!("Email already registered: {}", email)));
        }

        let manager = UserAccount {
            id: UserAccount::generate_id(),
            name,
            email,
            role: UserRole::Manager,
            function: Some("Director".to_string()),
            password: command.password,
        };
        self.user_repository.store_user(&manager).await?;

        info!("Registered manager {} with ID: {}", manager.email, manager.id);
        Ok(manager)
    }

    /// Resolve the id a request claims to act as
    pub async fn resolve_caller(&self, user_id: &str) -> ServiceResult<Option<UserAccount>> {
        Ok(self.user_repository.get_user(user_id).await?)
    }
}
