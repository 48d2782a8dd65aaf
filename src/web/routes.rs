//! Web dashboard route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    create_link_handler, dashboard_handler, delete_link_handler, login_page_handler,
    login_submit_handler, logout_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Protected dashboard routes requiring a logged-in session.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /`                  - Link list with creation form
/// - `POST /links`             - Create a link
/// - `POST /links/{id}/delete` - Delete a link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/links", post(create_link_handler))
        .route("/links/{id}/delete", post(delete_link_handler))
}

/// Public dashboard routes without authentication.
///
/// # Endpoints
///
/// - `GET  /login`  - Login page
/// - `POST /login`  - Submit credentials
/// - `POST /logout` - End the session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page_handler).post(login_submit_handler))
        .route("/logout", post(logout_handler))
}
