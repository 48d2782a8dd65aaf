//! Login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::middleware::LOGIN_PATH;

/// Template for the login page.
///
/// Renders `templates/login.html` with pending flash messages.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {
    flashes: Vec<String>,
}

/// Form body for `POST /dashboard/login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /dashboard/login`
pub async fn login_page_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let flashes = state.sessions.take_flashes(&session).await?;
    Ok(LoginTemplate { flashes })
}

/// Checks credentials and starts a session.
///
/// # Endpoint
///
/// `POST /dashboard/login`
///
/// On success the previous session is replaced and the browser is sent to
/// `/dashboard`. On failure a flash message is queued and the browser is
/// sent back to the login page.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    match state
        .auth_service
        .verify_credentials(form.username.trim(), &form.password)
        .await
    {
        Ok(user) => {
            state.sessions.login(&session, user.id).await?;
            Ok(Redirect::to("/dashboard"))
        }
        Err(e @ (AppError::Unauthorized { .. } | AppError::Validation { .. })) => {
            state.sessions.flash(&session, e.to_string()).await?;
            Ok(Redirect::to(LOGIN_PATH))
        }
        Err(e) => Err(e),
    }
}

/// Ends the dashboard session.
///
/// # Endpoint
///
/// `POST /dashboard/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    state.sessions.logout(&session).await;
    state
        .sessions
        .flash(&session, "You have been logged out")
        .await?;

    Ok(Redirect::to(LOGIN_PATH))
}
