//! Find-or-create of guardian accounts from the emails given at enrollment.
//!
//! The lookup and the insert are separate statements, so two enrollments
//! racing on the same new email can both miss and the second insert then
//! fails on the unique email index.

use std::sync::Arc;
use tracing::info;

use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::models::user::{normalize_email, UserAccount};
use crate::backend::storage::{Connection, UserStorage};
use shared::UserRole;

#[derive(Clone)]
pub struct IdentityResolver<C: Connection> {
    user_repository: C::UserRepository,
    placeholder_password: String,
}

impl<C: Connection> IdentityResolver<C> {
    pub fn new(connection: Arc<C>, placeholder_password: String) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            placeholder_password,
        }
    }

    /// Return the id of the user owning `email`, creating a guardian named
    /// after the student when nobody does
    ///
    /// An existing account is returned whatever its role.
    pub async fn resolve_guardian(&self, email: &str, student_name: &str) -> ServiceResult<String> {
        let email = validate_email(email)?;

        if let Some(existing) = self.user_repository.find_user_by_email(&email).await? {
            info!("Resolved {} to existing user {}", email, existing.id);
            return Ok(existing.id);
        }

        let guardian = UserAccount {
            id: UserAccount::generate_id(),
            name: format!("Family of {}", student_name.trim()),
            email,
            role: UserRole::Guardian,
            function: None,
            password: self.placeholder_password.clone(),
        };
        self.user_repository.store_user(&guardian).await?;

        info!("Created guardian {} for {}", guardian.id, guardian.email);
        Ok(guardian.id)
    }
}

/// Normalize an email and reject obviously malformed ones
pub fn validate_email(raw: &str) -> ServiceResult<String> {
    let email = normalize_email(raw);
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };

    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(ServiceError::Invalid(format!("Invalid email address: '{}'", raw.trim())));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::test_support::*;
    use crate::backend::storage::DbConnection;

    async fn create_test_resolver() -> (IdentityResolver<DbConnection>, DbConnection) {
        let db = seeded_school().await;
        (IdentityResolver::new(Arc::new(db.clone()), "123".to_string()), db)
    }

    #[tokio::test]
    async fn test_existing_user_is_found_case_insensitively() {
        let (resolver, _db) = create_test_resolver().await;

        let id = resolver
            .resolve_guardian("  Family.Lia@MAIL.com ", "Lia")
            .await
            .unwrap();

        assert_eq!(id, GUARDIAN_ID);
    }

    #[tokio::test]
    async fn test_existing_staff_email_resolves_to_staff_account() {
        let (resolver, _db) = create_test_resolver().await;

        let id = resolver.resolve_guardian("tania@school.com", "Theo").await.unwrap();

        assert_eq!(id, TEACHER_ID);
    }

    #[tokio::test]
    async fn test_unknown_email_creates_guardian() {
        let (resolver, db) = create_test_resolver().await;

        let id = resolver.resolve_guardian("New.Parent@Mail.com", " Theo ").await.unwrap();

        let created = db.create_user_repository().get_user(&id).await.unwrap().unwrap();
        assert_eq!(created.name, "Family of Theo");
        assert_eq!(created.email, "new.parent@mail.com");
        assert_eq!(created.role, UserRole::Guardian);
        assert_eq!(created.password, "123");

        let again = resolver.resolve_guardian("new.parent@mail.com", "Theo").await.unwrap();
        assert_eq!(again, id);
    }

    #[tokio::test]
    async fn test_malformed_email_is_rejected() {
        let (resolver, db) = create_test_resolver().await;
        let before = db.create_user_repository().list_users().await.unwrap().len();

        for email in ["", "   ", "no-at-sign", "@mail.com", "parent@", "a b@mail.com"] {
            let result = resolver.resolve_guardian(email, "Theo").await;
            assert!(matches!(result, Err(ServiceError::Invalid(_))), "accepted {:?}", email);
        }

        let after = db.create_user_repository().list_users().await.unwrap().len();
        assert_eq!(before, after);
    }
}
