//! Link management form handlers.
//!
//! Both handlers redirect back to the dashboard. Outcomes, including
//! user-facing errors, are reported through flash messages.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Form body for `POST /dashboard/links`.
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub password: String,
}

/// Creates a link from the dashboard form.
///
/// # Endpoint
///
/// `POST /dashboard/links`
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<CreateLinkForm>,
) -> Result<Redirect, AppError> {
    let password = Some(form.password.as_str()).filter(|p| !p.is_empty());

    let message = match state.link_service.create(user.id, &form.url, password).await {
        Ok(link) => format!("Created {}", state.link_service.short_url(&link.key)),
        Err(e) if e.status().is_client_error() || matches!(e, AppError::Dependency { .. }) => {
            e.to_string()
        }
        Err(e) => return Err(e),
    };

    back_to_dashboard(&state, &session, message).await
}

/// Deletes a link from the dashboard.
///
/// # Endpoint
///
/// `POST /dashboard/links/{id}/delete`
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    session: Session,
) -> Result<Redirect, AppError> {
    let message = match state.link_service.delete(user.id, id).await {
        Ok(()) => "Link deleted".to_string(),
        Err(e) if e.status().is_client_error() => e.to_string(),
        Err(e) => return Err(e),
    };

    back_to_dashboard(&state, &session, message).await
}

async fn back_to_dashboard(
    state: &AppState,
    session: &Session,
    message: String,
) -> Result<Redirect, AppError> {
    state.sessions.flash(session, message).await?;
    Ok(Redirect::to("/dashboard"))
}
