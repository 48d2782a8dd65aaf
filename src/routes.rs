//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /{key}`       - Short link redirect (public)
//! - `POST /{key}`       - Password-gated redirect (public, form body)
//! - `GET  /health`      - Health check: DB and safety oracle (public)
//! - `/api/register`, `/api/login` - Account endpoints (public)
//! - `/api/links*`       - Link management (Bearer token required)
//! - `/dashboard/*`      - Web UI (cookie session required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Sessions** - Signed `sid` cookie, dashboard only
//! - **Authentication** - Bearer token (API) or cookie session (web)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, unlock_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the router with all routes and per-route middleware.
pub fn build_router(state: AppState) -> Router {
    let api_router = api::routes::public_routes().merge(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
    );

    let web_protected = web::routes::protected_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), web_auth::layer),
    );

    let web_router = Router::new()
        .merge(web_protected)
        .merge(web::routes::public_routes())
        .layer(state.sessions.layer());

    Router::new()
        .route("/{key}", get(redirect_handler).post(unlock_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest("/dashboard", web_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Wraps [`build_router`] with trailing-slash normalization.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
