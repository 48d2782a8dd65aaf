#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use url_shortener::application::services::{SessionService, TokenService};
use url_shortener::domain::entities::{NewLink, NewUser};
use url_shortener::domain::repositories::{LinkRepository, UserRepository};
use url_shortener::infrastructure::persistence::{SqliteLinkRepository, SqliteUserRepository};
use url_shortener::infrastructure::safety::{
    FailurePolicy, NullOracle, SafeBrowsingOracle, SafetyOracle, ThreatList,
};
use url_shortener::routes::build_router;
use url_shortener::state::AppState;
use url_shortener::utils::password::hash_password;

pub const BASE_URL: &str = "http://s.test";
pub const TOKEN_TTL: Duration = Duration::from_secs(3600);
pub const TOKEN_GRACE: Duration = Duration::from_secs(86_400);
pub const PASSWORD: &str = "correct horse battery";

/// Host listed in the local threat list of [`unsafe_oracle`].
pub const MALWARE_HOST: &str = "malware.test";

/// Safe Browsing key configured on [`unsafe_oracle`].
pub const SAFETY_API_KEY: &str = "test-api-key-0123";

/// Nothing listens on the discard port, so remote lookups always fail.
const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:9/unreachable";

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(b"test-jwt-secret", TOKEN_TTL, TOKEN_GRACE))
}

pub fn session_service() -> Arc<SessionService> {
    Arc::new(SessionService::new(
        b"test-session-secret",
        Duration::from_secs(3600),
        false,
    ))
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    create_test_state_with_oracle(pool, Arc::new(NullOracle::new()))
}

pub fn create_test_state_with_oracle(pool: SqlitePool, oracle: Arc<dyn SafetyOracle>) -> AppState {
    AppState::new(
        Arc::new(pool),
        token_service(),
        session_service(),
        oracle,
        BASE_URL,
    )
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

/// Oracle that flags [`MALWARE_HOST`] locally and cannot reach the remote API.
pub fn unsafe_oracle(policy: FailurePolicy) -> Arc<dyn SafetyOracle> {
    let oracle = SafeBrowsingOracle::new(SAFETY_API_KEY, Duration::from_millis(500), policy)
        .unwrap()
        .with_endpoint(UNREACHABLE_ENDPOINT)
        .with_threat_list(ThreatList::parse(MALWARE_HOST));
    Arc::new(oracle)
}

pub async fn create_test_user(pool: &SqlitePool, username: &str) -> i64 {
    let repo = SqliteUserRepository::new(Arc::new(pool.clone()));
    repo.create(NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(PASSWORD).await.unwrap(),
    })
    .await
    .unwrap()
    .id
}

pub async fn create_test_link(
    pool: &SqlitePool,
    key: &str,
    url: &str,
    user_id: i64,
    password: Option<&str>,
) -> i64 {
    let password_hash = match password {
        Some(p) => Some(hash_password(p).await.unwrap()),
        None => None,
    };

    let repo = SqliteLinkRepository::new(Arc::new(pool.clone()));
    repo.create(NewLink {
        key: key.to_string(),
        target_url: url.to_string(),
        user_id,
        password_hash,
    })
    .await
    .unwrap()
    .id
}

pub async fn link_clicks(pool: &SqlitePool, key: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM links WHERE short_key = ?")
        .bind(key)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// `Authorization` header value for a fresh token.
pub fn bearer(state: &AppState, user_id: i64) -> String {
    format!("Bearer {}", state.tokens.issue(user_id).unwrap().token)
}

/// `Authorization` header value for a token issued `age` ago.
pub fn bearer_issued_ago(state: &AppState, user_id: i64, age: ChronoDuration) -> String {
    let issued = state.tokens.issue_at(user_id, Utc::now() - age).unwrap();
    format!("Bearer {}", issued.token)
}

/// Extracts `sid=<value>` from a `Set-Cookie` header for use in `Cookie`.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}
