//! # URL Shortener
//!
//! A URL shortening service built with Axum and SQLite, with per-user
//! links, password-gated redirects and Safe Browsing screening.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Core business entities and repository traits
//! - **Application Layer** ([`application`]) - Business logic and service orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - Database and the safety oracle
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//! - **Web Layer** ([`web`]) - HTML dashboard for link management
//!
//! ## Features
//!
//! - Bearer tokens for the API with a one-shot refresh after expiry
//! - Cookie sessions with flash messages for the dashboard
//! - Optional per-link passwords
//! - URL screening against Google Safe Browsing and a local threat list
//! - Atomic click counting
//!
//! ## Quick Start
//!
//! ```bash
//! export JWT_SECRET_KEY="change-me"
//! export DB_PATH="data/url-shortener.sqlite3"   # Optional
//! export SAFE_BROWSING_API_KEY="..."             # Optional
//!
//! # Start the service; migrations run at startup
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, LinkResolver, LinkService, SessionService, TokenService,
    };
    pub use crate::domain::entities::{Link, NewLink, User};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
