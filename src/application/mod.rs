//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the API used by HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::TokenService`] - Bearer token issue, validation, refresh
//! - [`services::SessionService`] - Signed cookie sessions and flash messages
//! - [`services::AccessGuard`] - Credential to user resolution
//! - [`services::AuthService`] - Registration and login
//! - [`services::LinkService`] - Link creation and owner-scoped management
//! - [`services::LinkResolver`] - Short key resolution with password gate
//! - [`services::SafetyGate`] - Safety policy enforcement

pub mod services;
