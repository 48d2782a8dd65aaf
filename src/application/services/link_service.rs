//! Link creation and owner-scoped management.

use std::sync::Arc;

use crate::application::services::safety_gate::SafetyGate;
use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::counters;
use crate::utils::key_generator::generate_key;
use crate::utils::password::hash_password;
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;

/// Requested changes to a link.
///
/// `password: Some(None)` or `Some(Some(""))` removes the gate.
#[derive(Debug, Clone, Default)]
pub struct LinkUpdate {
    pub url: Option<String>,
    pub password: Option<Option<String>>,
}

/// Service for creating and managing shortened links.
///
/// Every target URL is normalized and screened before it is stored. All
/// operations except creation are restricted to the link's owner.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    safety: SafetyGate,
    base_url: String,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, safety: SafetyGate, base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            safety,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Shortens `url` for `user_id`.
    ///
    /// An empty or absent `password` creates an ungated link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is invalid.
    /// Returns [`AppError::UnsafeUrl`] or [`AppError::Dependency`] from screening.
    /// Returns [`AppError::Internal`] if no free key is found.
    pub async fn create(
        &self,
        user_id: i64,
        url: &str,
        password: Option<&str>,
    ) -> Result<Link, AppError> {
        let target_url = normalize(url)?;
        self.safety.screen(&target_url).await?;

        let password_hash = match password.filter(|p| !p.is_empty()) {
            Some(p) => Some(hash_password(p).await?),
            None => None,
        };

        let link = self
            .insert_with_unique_key(user_id, target_url, password_hash)
            .await?;

        counters::increment_link_created();
        tracing::info!(link_id = link.id, key = %link.key, user_id, "Link created");
        Ok(link)
    }

    /// Lists a user's links, newest first.
    pub async fn list(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_user(user_id).await
    }

    /// Fetches a link that `user_id` owns.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id and
    /// [`AppError::Forbidden`] when someone else owns the link.
    pub async fn get_owned(&self, user_id: i64, id: i64) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        if !link.is_owned_by(user_id) {
            return Err(AppError::forbidden(
                "You do not own this link",
                json!({ "id": id }),
            ));
        }

        Ok(link)
    }

    /// Changes the target or the password gate of an owned link.
    ///
    /// A changed URL is normalized and screened again.
    ///
    /// # Errors
    ///
    /// See [`Self::get_owned`] and [`Self::create`].
    pub async fn update(&self, user_id: i64, id: i64, update: LinkUpdate) -> Result<Link, AppError> {
        self.get_owned(user_id, id).await?;

        let target_url = match update.url.as_deref() {
            Some(url) => {
                let normalized = normalize(url)?;
                self.safety.screen(&normalized).await?;
                Some(normalized)
            }
            None => None,
        };

        let password_hash = match update.password {
            None => None,
            Some(p) => match p.filter(|p| !p.is_empty()) {
                Some(p) => Some(Some(hash_password(&p).await?)),
                None => Some(None),
            },
        };

        let link = self
            .link_repository
            .update(
                id,
                LinkPatch {
                    target_url,
                    password_hash,
                },
            )
            .await?;

        tracing::info!(link_id = id, user_id, "Link updated");
        Ok(link)
    }

    /// Deletes an owned link.
    ///
    /// # Errors
    ///
    /// See [`Self::get_owned`].
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        self.get_owned(user_id, id).await?;

        if !self.link_repository.delete(id).await? {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        tracing::info!(link_id = id, user_id, "Link deleted");
        Ok(())
    }

    /// Constructs the public short URL for a key.
    pub fn short_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Generates keys until one is free, then inserts.
    ///
    /// A key taken between the check and the insert surfaces as a conflict
    /// and is retried. Attempts up to 10 times before failing.
    async fn insert_with_unique_key(
        &self,
        user_id: i64,
        target_url: String,
        password_hash: Option<String>,
    ) -> Result<Link, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for attempt in 1..=MAX_ATTEMPTS {
            let key = generate_key(&target_url);

            if self.link_repository.find_by_key(&key).await?.is_some() {
                tracing::debug!(attempt, %key, "Key collision");
                continue;
            }

            let new_link = NewLink {
                key,
                target_url: target_url.clone(),
                user_id,
                password_hash: password_hash.clone(),
            };

            match self.link_repository.create(new_link).await {
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(attempt, "Key taken concurrently");
                }
                other => return other,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique key",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

fn normalize(url: &str) -> Result<String, AppError> {
    normalize_url(url)
        .map_err(|e| AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() })))
}
