//! Handlers for account registration and login.

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::api::middleware::AUTH_TOKEN_HEADER;
use crate::application::services::AuthOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account and returns its first token.
///
/// # Endpoint
///
/// `POST /api/register`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "email": "alice@example.com", "password": "correct horse" }
/// ```
///
/// # Response
///
/// **201 Created** with `{token, expires_at, user}`; the token is also sent
/// in the `X-Auth-Token` header.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the username is taken.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let outcome = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    token_response(StatusCode::CREATED, outcome)
}

/// Exchanges a username and password for a token.
///
/// # Endpoint
///
/// `POST /api/login`
///
/// # Errors
///
/// Returns 401 Unauthorized with one message for an unknown user and a wrong
/// password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let outcome = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    token_response(StatusCode::OK, outcome)
}

fn token_response(status: StatusCode, outcome: AuthOutcome) -> Result<Response, AppError> {
    let header = HeaderValue::from_str(&outcome.token.token).map_err(|e| {
        tracing::error!(error = %e, "Issued token is not a valid header value");
        AppError::internal("Failed to issue token", json!({}))
    })?;

    let body = AuthResponse::from(outcome);
    Ok((status, [(AUTH_TOKEN_HEADER, header)], Json(body)).into_response())
}
