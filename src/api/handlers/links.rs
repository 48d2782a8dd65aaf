//! Handlers for owner-scoped link management.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest};
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list(user.id).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.key);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com", "password": "optional" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is invalid.
/// Returns 403 Forbidden if the URL is flagged as unsafe.
/// Returns 503 Service Unavailable if screening fails under the strict policy.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(user.id, &payload.url, payload.password.as_deref())
        .await?;

    let short_url = state.link_service.short_url(&link.key);
    Ok((StatusCode::CREATED, Json(LinkResponse::from_link(link, short_url))))
}

/// Returns one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown id and 403 Forbidden for a link
/// owned by someone else.
pub async fn get_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_owned(user.id, id).await?;
    let short_url = state.link_service.short_url(&link.key);
    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Changes the target or password gate of a link.
///
/// # Endpoint
///
/// `PUT /api/links/{id}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed.
///
/// ```json
/// { "url": "https://new-destination.com", "password": null }
/// ```
///
/// # Errors
///
/// Same as [`create_link_handler`] and [`get_link_handler`].
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update(user.id, id, payload.into())
        .await?;

    let short_url = state.link_service.short_url(&link.key);
    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Response
///
/// **204 No Content** on success.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
