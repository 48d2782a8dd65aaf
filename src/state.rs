//! Shared application state injected into every handler.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::application::services::{
    AccessGuard, AuthService, LinkResolver, LinkService, SafetyGate, SessionService, TokenService,
};
use crate::infrastructure::persistence::{SqliteLinkRepository, SqliteUserRepository};
use crate::infrastructure::safety::SafetyOracle;

pub type ApiGuard = AccessGuard<SqliteUserRepository, TokenService>;
pub type WebGuard = AccessGuard<SqliteUserRepository, SessionService>;

/// Cloneable handle to services and connections.
///
/// Every field is reference-counted; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqlitePool>,
    pub auth_service: Arc<AuthService<SqliteUserRepository>>,
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
    pub link_resolver: Arc<LinkResolver<SqliteLinkRepository>>,
    pub tokens: Arc<TokenService>,
    pub sessions: Arc<SessionService>,
    /// Bearer-token guard for `/api`.
    pub api_guard: Arc<ApiGuard>,
    /// Cookie-session guard for `/dashboard`.
    pub web_guard: Arc<WebGuard>,
    pub safety: SafetyGate,
}

impl AppState {
    /// Wires repositories and services around one pool.
    ///
    /// `tokens` and `sessions` are built by the caller from configured secrets.
    pub fn new(
        pool: Arc<SqlitePool>,
        tokens: Arc<TokenService>,
        sessions: Arc<SessionService>,
        oracle: Arc<dyn SafetyOracle>,
        base_url: &str,
    ) -> Self {
        let users = Arc::new(SqliteUserRepository::new(pool.clone()));
        let links = Arc::new(SqliteLinkRepository::new(pool.clone()));
        let safety = SafetyGate::new(oracle);

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), tokens.clone())),
            link_service: Arc::new(LinkService::new(links.clone(), safety.clone(), base_url)),
            link_resolver: Arc::new(LinkResolver::new(links, safety.clone())),
            api_guard: Arc::new(AccessGuard::new(users.clone(), tokens.clone())),
            web_guard: Arc::new(AccessGuard::new(users, sessions.clone())),
            tokens,
            sessions,
            safety,
            db: pool,
        }
    }
}
