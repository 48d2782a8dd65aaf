//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by a user.
///
/// `password_hash` gates resolution when present. `clicks` only grows; it is
/// incremented in the store, never rewritten by application code.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub key: String,
    pub target_url: String,
    pub user_id: i64,
    pub password_hash: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        key: String,
        target_url: String,
        user_id: i64,
        password_hash: Option<String>,
        clicks: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key,
            target_url,
            user_id,
            password_hash,
            clicks,
            created_at,
        }
    }

    /// Returns true if resolving this link requires a password.
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    /// Returns true if `user_id` owns this link.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub key: String,
    pub target_url: String,
    pub user_id: i64,
    pub password_hash: Option<String>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `password_hash: Some(None)` removes the gate; `Some(Some(h))` replaces it.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub target_url: Option<String>,
    pub password_hash: Option<Option<String>>,
}
