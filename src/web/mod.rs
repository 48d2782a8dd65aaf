//! Web dashboard layer for browser-based link management.
//!
//! Uses Askama templates for server-side rendering and a signed `sid`
//! cookie for sessions. Outcomes of form posts are reported via flash
//! messages on the next page.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering and form handlers
//! - [`middleware`] - Session authentication
//! - [`routes`] - Dashboard route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
