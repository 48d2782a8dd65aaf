//! Business logic services for the application layer.

pub mod access_guard;
pub mod auth_service;
pub mod link_resolver;
pub mod link_service;
pub mod safety_gate;
pub mod session_service;
pub mod token_service;

pub use access_guard::{AccessGuard, Authorized, Identity, IdentityStrategy};
pub use auth_service::{AuthOutcome, AuthService};
pub use link_resolver::LinkResolver;
pub use link_service::{LinkService, LinkUpdate};
pub use safety_gate::SafetyGate;
pub use session_service::{SESSION_COOKIE, SessionService};
pub use token_service::{Claims, IssuedToken, TokenError, TokenService, TokenStatus};
