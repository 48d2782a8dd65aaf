//! Cookie-session authentication middleware for the web dashboard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Redirect, Response},
};
use tower_sessions::Session;

use crate::api::middleware::CurrentUser;
use crate::state::AppState;

/// Path unauthenticated browsers are sent to.
pub const LOGIN_PATH: &str = "/dashboard/login";

/// Authenticates dashboard requests using the session cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: sid=<signature><session-id>
/// ```
///
/// # Authentication Flow
///
/// 1. The session layer verifies the `sid` cookie and loads the session
/// 2. Require a logged-in user on the session
/// 3. On success, continue with [`CurrentUser`] in the request extensions
/// 4. Otherwise redirect to `/dashboard/login`
///
/// Unlike the API middleware, which returns `401 Unauthorized`, this one
/// redirects to the login page. Must run inside
/// [`crate::application::services::SessionService::layer`].
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/", get(dashboard_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), web_auth::layer))
///     .layer(state.sessions.layer());
/// ```
pub async fn layer(
    State(st): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    match st.web_guard.authorize(Some(&session)).await {
        Ok(authorized) => {
            req.extensions_mut().insert(CurrentUser(authorized.user));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::debug!(reason = %e, "Dashboard request without a valid session");
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}
