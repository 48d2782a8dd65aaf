//! Cookie sessions for the web dashboard.
//!
//! Backed by `tower-sessions`: values live in an in-process [`MemoryStore`]
//! and the browser holds a signed `sid` cookie naming them. A session carries
//! the logged-in user id and a queue of one-shot flash messages.

use async_trait::async_trait;
use serde_json::json;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::application::services::access_guard::{Identity, IdentityStrategy};
use crate::error::AppError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

const USER_KEY: &str = "user_id";
const FLASH_KEY: &str = "flashes";

/// Session lifecycle: log in, flash, log out.
pub struct SessionService {
    store: MemoryStore,
    key: Key,
    ttl: time::Duration,
    secure_cookie: bool,
}

impl SessionService {
    /// Creates the service.
    ///
    /// `secret` keys the cookie signature and must stay stable for cookies to
    /// survive a restart. Any length is accepted; it is stretched to the
    /// 64-byte signing key with SHA-512.
    pub fn new(secret: &[u8], ttl: std::time::Duration, secure_cookie: bool) -> Self {
        Self {
            store: MemoryStore::default(),
            key: Key::from(Sha512::digest(secret).as_slice()),
            ttl: time::Duration::try_from(ttl).unwrap_or(time::Duration::days(7)),
            secure_cookie,
        }
    }

    /// Layer that loads the session named by the `sid` cookie and writes it
    /// back after the handler ran.
    ///
    /// A missing, tampered, or expired cookie yields an empty session.
    pub fn layer(&self) -> SessionManagerLayer<MemoryStore, SignedCookie> {
        SessionManagerLayer::new(self.store.clone())
            .with_name(SESSION_COOKIE)
            .with_http_only(true)
            .with_same_site(SameSite::Lax)
            .with_secure(self.secure_cookie)
            .with_expiry(Expiry::OnInactivity(self.ttl))
            .with_signed(self.key.clone())
    }

    /// Returns the user logged into `session`, if any.
    pub async fn user_id(&self, session: &Session) -> Result<Option<i64>, AppError> {
        Ok(session.get::<i64>(USER_KEY).await?)
    }

    /// Logs `user_id` into `session` under a fresh session id.
    ///
    /// The previous id is deleted from the store so an id handed out before
    /// login is never promoted.
    pub async fn login(&self, session: &Session, user_id: i64) -> Result<(), AppError> {
        session.cycle_id().await?;
        session.insert(USER_KEY, user_id).await?;

        tracing::info!(user_id, "Dashboard session started");
        Ok(())
    }

    /// Clears every value of `session`.
    pub async fn logout(&self, session: &Session) {
        session.clear().await;
    }

    /// Queues a one-shot message.
    pub async fn flash(&self, session: &Session, message: impl Into<String>) -> Result<(), AppError> {
        let mut flashes = session
            .get::<Vec<String>>(FLASH_KEY)
            .await?
            .unwrap_or_default();
        flashes.push(message.into());
        session.insert(FLASH_KEY, flashes).await?;
        Ok(())
    }

    /// Removes and returns pending flash messages.
    pub async fn take_flashes(&self, session: &Session) -> Result<Vec<String>, AppError> {
        Ok(session
            .remove::<Vec<String>>(FLASH_KEY)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl IdentityStrategy for SessionService {
    type Credential = Session;

    async fn identify(&self, session: &Session) -> Result<Identity, AppError> {
        self.user_id(session).await?.map(Identity::new).ok_or_else(|| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Not logged in" }))
        })
    }
}
