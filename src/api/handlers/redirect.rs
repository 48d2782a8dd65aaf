//! Handlers for short key resolution.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::dto::links::UnlockForm;
use crate::error::AppError;
use crate::state::AppState;

/// Password prompt shown to browsers for gated links.
#[derive(Template, WebTemplate)]
#[template(path = "unlock.html")]
struct UnlockTemplate {
    key: String,
    error: Option<String>,
}

/// Redirects a short key to its target.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// # Request Flow
///
/// 1. Look up the key
/// 2. Reject password-gated links (no password can be supplied on GET)
/// 3. Screen the target URL
/// 4. Increment the click counter
/// 5. Return 307 Temporary Redirect
///
/// Browsers (`Accept: text/html`) get a password form instead of the JSON
/// error for gated links; the form posts to `POST /{key}`.
///
/// # Errors
///
/// Returns 404 Not Found for an unknown key.
/// Returns 401 `password_required` for a gated link.
/// Returns 403 / 503 from safety screening.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    match state.link_resolver.resolve(&key, None).await {
        Ok(target) => Ok(Redirect::temporary(&target).into_response()),
        Err(AppError::PasswordRequired { .. }) if wants_html(&headers) => Ok((
            StatusCode::UNAUTHORIZED,
            UnlockTemplate { key, error: None },
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// Resolves a gated link with a form-supplied password.
///
/// # Endpoint
///
/// `POST /{key}` with `application/x-www-form-urlencoded` body `password=...`
///
/// # Response
///
/// **303 See Other** to the target on success.
///
/// # Errors
///
/// Returns 401 `password_required` when the password is empty and 401
/// `unauthorized` when it is wrong.
pub async fn unlock_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<UnlockForm>,
) -> Result<Response, AppError> {
    match state.link_resolver.resolve(&key, Some(&form.password)).await {
        Ok(target) => Ok(Redirect::to(&target).into_response()),
        Err(e @ (AppError::PasswordRequired { .. } | AppError::Unauthorized { .. }))
            if wants_html(&headers) =>
        {
            let status = e.status();
            Ok((
                status,
                UnlockTemplate {
                    key,
                    error: Some(e.to_string()),
                },
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
