//! Short key to target resolution.

use serde_json::json;
use std::sync::Arc;

use crate::application::services::safety_gate::SafetyGate;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::counters;
use crate::utils::password::verify_password;

/// Turns a short key into a redirect target.
///
/// Resolution order: lookup, password gate, safety screening, click
/// increment. A request that fails any step leaves the counter untouched.
pub struct LinkResolver<L: LinkRepository> {
    link_repository: Arc<L>,
    safety: SafetyGate,
}

impl<L: LinkRepository> LinkResolver<L> {
    pub fn new(link_repository: Arc<L>, safety: SafetyGate) -> Self {
        Self {
            link_repository,
            safety,
        }
    }

    /// Resolves `key`, checking `password` against gated links.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown key
    /// - [`AppError::PasswordRequired`] when a gated link gets no password
    /// - [`AppError::Unauthorized`] when the password is wrong
    /// - [`AppError::UnsafeUrl`] / [`AppError::Dependency`] from screening
    pub async fn resolve(&self, key: &str, password: Option<&str>) -> Result<String, AppError> {
        let link = self
            .link_repository
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "key": key })))?;

        if let Some(hash) = link.password_hash.as_deref().filter(|h| !h.is_empty()) {
            let Some(password) = password.filter(|p| !p.is_empty()) else {
                return Err(AppError::password_required(
                    "This link is password protected",
                    json!({ "key": key }),
                ));
            };

            if !verify_password(password, hash).await? {
                return Err(AppError::unauthorized(
                    "Incorrect password",
                    json!({ "key": key }),
                ));
            }
        }

        self.safety.screen(&link.target_url).await?;

        self.link_repository.increment_clicks(link.id).await?;
        counters::increment_link_resolved();

        tracing::debug!(key, link_id = link.id, "Link resolved");
        Ok(link.target_url)
    }
}
