//! Account registration and credential checks.

use serde_json::json;
use std::sync::Arc;

use crate::application::services::token_service::{IssuedToken, TokenService};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Service for creating accounts and authenticating users.
///
/// Passwords are hashed with Argon2id; the plaintext never reaches the store.
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Creates an account without issuing a token.
    ///
    /// Input is expected to be validated already.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username is taken.
    /// Returns [`AppError::Internal`] on hashing or database errors.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(username_taken(username));
        }

        let password_hash = hash_password(password).await?;

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => username_taken(username),
                other => other,
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Registers an account and issues its first token.
    ///
    /// # Errors
    ///
    /// See [`Self::create_user`].
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AppError> {
        let user = self.create_user(username, email, password).await?;
        let token = self.tokens.issue(user.id)?;
        Ok(AuthOutcome { user, token })
    }

    /// Checks a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with the same message whether the
    /// user is unknown or the password is wrong.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::debug!(username, "Login for unknown user");
            return Err(invalid_credentials());
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::debug!(user_id = user.id, "Login with wrong password");
            return Err(invalid_credentials());
        }

        Ok(user)
    }

    /// Authenticates and issues a token.
    ///
    /// # Errors
    ///
    /// See [`Self::verify_credentials`].
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let user = self.verify_credentials(username, password).await?;
        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(AuthOutcome { user, token })
    }
}

fn username_taken(username: &str) -> AppError {
    AppError::conflict("Username already taken", json!({ "username": username }))
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(
        "Invalid username or password",
        json!({ "reason": "Invalid credentials" }),
    )
}
