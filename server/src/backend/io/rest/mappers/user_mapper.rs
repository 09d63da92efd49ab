//! Conversion of user accounts to their public form.

use crate::backend::domain::models::user::UserAccount;
use shared::{User, UserListResponse};

/// Mapper from stored accounts to `shared::User`; the password never leaves
pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: UserAccount) -> User {
        User {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            role: domain.role,
            function: domain.function,
        }
    }

    pub fn to_list_dto(domain_users: Vec<UserAccount>) -> UserListResponse {
        UserListResponse {
            users: domain_users.into_iter().map(Self::to_dto).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserRole;

    #[test]
    fn test_password_is_not_serialized() {
        let account = UserAccount {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@school.com".to_string(),
            role: UserRole::Teacher,
            function: Some("Assistant".to_string()),
            password: "hunter2".to_string(),
        };

        let json = serde_json::to_string(&UserMapper::to_dto(account)).unwrap();

        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"role\":\"teacher\""));
    }
}
