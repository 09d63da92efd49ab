use shared::UserRole;

/// A user as stored, including the login credential
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    /// Always stored trimmed and lower-cased
    pub email: String,
    pub role: UserRole,
    pub function: Option<String>,
    pub password: String,
}

impl UserAccount {
    pub fn generate_id() -> String {
        super::generate_id("user")
    }

    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Canonical form of an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana.Souza@Example.COM "), "ana.souza@example.com");
    }
}
