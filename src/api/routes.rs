//! API route configuration.
//!
//! Account endpoints are public; link endpoints require Bearer token
//! authentication via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    login_handler, register_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Account routes, no authentication.
///
/// # Endpoints
///
/// - `POST /register` - Create an account, returns a token
/// - `POST /login`    - Exchange credentials for a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}

/// Link routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /links`      - List the caller's links
/// - `POST   /links`      - Create a link
/// - `GET    /links/{id}` - Fetch one link
/// - `PUT    /links/{id}` - Change target or password gate
/// - `DELETE /links/{id}` - Delete a link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .put(update_link_handler)
                .delete(delete_link_handler),
        )
}
