//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_auth::AuthBearer;

use crate::domain::entities::User;
use crate::state::AppState;

/// Response header carrying a newly minted token.
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Validate signature and expiry
/// 3. Refresh an expired token once if it is still inside the grace window
/// 4. Load the user named by the token
/// 5. Continue with [`CurrentUser`] in the request extensions
///
/// A refreshed token is returned in the `X-Auth-Token` response header.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing or not a Bearer credential
/// - Token signature or structure is invalid
/// - Token expired beyond the refresh window
/// - The user no longer exists
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/links", get(list_links_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let token = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token);
    let token = token.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let authorized = match st.api_guard.authorize(token).await {
        Ok(authorized) => authorized,
        Err(e) => {
            let unauthorized = e.status() == StatusCode::UNAUTHORIZED;
            let mut response = e.into_response();
            if unauthorized {
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Bearer"),
                );
            }
            return response;
        }
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(CurrentUser(authorized.user));

    let mut response = next.run(req).await;

    if let Some(fresh) = authorized.replacement_credential
        && let Ok(value) = HeaderValue::from_str(&fresh)
    {
        response.headers_mut().insert(AUTH_TOKEN_HEADER, value);
    }

    response
}
