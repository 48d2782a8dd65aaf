//! Credential-to-user resolution for protected routes.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Subject established from a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    /// Fresh credential the caller should switch to, if one was minted.
    pub replacement_credential: Option<String>,
}

impl Identity {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            replacement_credential: None,
        }
    }

    pub fn refreshed(user_id: i64, credential: String) -> Self {
        Self {
            user_id,
            replacement_credential: Some(credential),
        }
    }
}

/// Turns a credential into an [`Identity`].
///
/// # Implementations
///
/// - [`crate::application::services::TokenService`] - signed bearer tokens with transparent refresh
/// - [`crate::application::services::SessionService`] - signed `sid` session cookies
#[cfg_attr(test, mockall::automock(type Credential = String;))]
#[async_trait]
pub trait IdentityStrategy: Send + Sync {
    /// What the request carries: a token string, a loaded session.
    type Credential: ?Sized + Sync;

    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when the credential cannot be trusted
    /// or carries no subject.
    async fn identify(&self, credential: &Self::Credential) -> Result<Identity, AppError>;
}

/// Outcome of a successful authorization.
#[derive(Debug, Clone)]
pub struct Authorized {
    pub user: User,
    pub replacement_credential: Option<String>,
}

/// Request-pipeline gate shared by the bearer and cookie surfaces.
pub struct AccessGuard<U: UserRepository, S: IdentityStrategy> {
    users: Arc<U>,
    strategy: Arc<S>,
}

impl<U: UserRepository, S: IdentityStrategy> AccessGuard<U, S> {
    pub fn new(users: Arc<U>, strategy: Arc<S>) -> Self {
        Self { users, strategy }
    }

    /// Resolves `credential` to a stored user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the credential is absent, rejected
    /// by the strategy, or names a user that no longer exists.
    pub async fn authorize(
        &self,
        credential: Option<&S::Credential>,
    ) -> Result<Authorized, AppError> {
        let credential = credential.ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Credential is missing" }),
            )
        })?;

        let identity = self.strategy.identify(credential).await?;

        let user = self
            .users
            .find_by_id(identity.user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = identity.user_id, "Credential names an unknown user");
                AppError::unauthorized("Unauthorized", json!({ "reason": "Unknown user" }))
            })?;

        Ok(Authorized {
            user,
            replacement_credential: identity.replacement_credential,
        })
    }
}
