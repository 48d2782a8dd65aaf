//! User entity.

use chrono::{DateTime, Utc};

/// A registered account.
///
/// `password_hash` is an Argon2 PHC string. It is only ever compared through
/// [`crate::utils::password::verify_password`] and is skipped by `Debug`.
#[derive(Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance.
    pub fn new(
        id: i64,
        username: String,
        email: String,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            created_at,
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Input data for creating a new user.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_omits_password_hash() {
        let user = User::new(
            1,
            "alice".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$v=19$secret".to_string(),
            Utc::now(),
        );

        let rendered = format!("{user:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("argon2id"));
    }
}
