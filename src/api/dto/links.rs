//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::application::services::LinkUpdate;
use crate::domain::entities::Link;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Target URL; `https://` is assumed when the scheme is omitted.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional password gate. Empty means no gate.
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

/// Request body for `PUT /api/links/{id}`.
///
/// # `password` semantics
///
/// - **Absent** → leave the gate unchanged
/// - **`null`** or `""` → remove the gate
/// - **String** → set a new password
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub password: Option<Option<String>>,
}

impl From<UpdateLinkRequest> for LinkUpdate {
    fn from(req: UpdateLinkRequest) -> Self {
        Self {
            url: req.url,
            password: req.password,
        }
    }
}

/// JSON representation of a link. The password hash is never exposed.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub key: String,
    pub short_url: String,
    pub target_url: String,
    pub password_protected: bool,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            password_protected: link.is_password_protected(),
            key: link.key,
            short_url,
            target_url: link.target_url,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}

/// Response for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

/// Form body for `POST /{key}`.
#[derive(Debug, Deserialize)]
pub struct UnlockForm {
    #[serde(default)]
    pub password: String,
}
