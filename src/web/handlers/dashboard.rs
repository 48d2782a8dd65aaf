//! Dashboard home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Extension, extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::api::middleware::CurrentUser;
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

/// One row of the links table.
pub struct LinkRow {
    pub id: i64,
    pub short_url: String,
    pub target_url: String,
    pub password_protected: bool,
    pub clicks: i64,
    pub created_at: String,
}

impl LinkRow {
    fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            password_protected: link.is_password_protected(),
            short_url,
            target_url: link.target_url,
            clicks: link.clicks,
            created_at: link.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Template for the dashboard home page.
///
/// Renders `templates/dashboard.html` with:
/// - Pending flash messages
/// - Link creation form
/// - The user's links with click counts
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub flashes: Vec<String>,
    pub links: Vec<LinkRow>,
}

/// Renders the dashboard home page.
///
/// # Endpoint
///
/// `GET /dashboard`
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let flashes = state.sessions.take_flashes(&session).await?;

    let links = state
        .link_service
        .list(user.id)
        .await?
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.key);
            LinkRow::new(link, short_url)
        })
        .collect();

    Ok(DashboardTemplate {
        username: user.username,
        flashes,
        links,
    })
}
