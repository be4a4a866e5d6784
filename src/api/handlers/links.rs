//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::warn;
use validator::Validate;

use crate::api::dto::clicks::ClickInfo;
use crate::api::dto::links::{
    CreateLinkRequest, LinkDetailResponse, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::api::middleware::CurrentUser;
use crate::application::services::CreateLink;
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "slug": "my-link",          // optional
///   "title": "Example",         // optional
///   "description": "..."        // optional
/// }
/// ```
///
/// Without a slug, an 8-character one is generated.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the requested slug is taken.
/// Returns 503 Service Unavailable if no free slug could be stored.
pub async fn create_link_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(
            user.id,
            CreateLink {
                url: payload.url,
                slug: payload.slug,
                title: payload.title,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(user.id).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| to_response(&state, link))
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Returns one of the caller's links with its most recent clicks.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist or belongs to another user.
pub async fn get_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<LinkDetailResponse>, AppError> {
    let link = state.link_service.get_link(user.id, id).await?;
    let recent_clicks = state.stats_service.recent_clicks(link.id).await?;

    Ok(Json(LinkDetailResponse {
        link: to_response(&state, link),
        recent_clicks: recent_clicks.into_iter().map(ClickInfo::from).collect(),
    }))
}

/// Partially updates one of the caller's links.
///
/// # Endpoint
///
/// `PUT /api/links/{id}`
///
/// # Request Body
///
/// All fields are optional. `title` and `description` accept `null` to clear.
///
/// ```json
/// {
///   "url": "https://new-destination.com",
///   "slug": "new-slug",
///   "title": null,
///   "is_active": false
/// }
/// ```
///
/// # Cache
///
/// Entries for both the previous and the new slug are invalidated.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 404 Not Found if the link does not exist or belongs to another user.
/// Returns 409 Conflict if the new slug is taken.
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .link_service
        .update_link(user.id, id, payload.into())
        .await?;

    invalidate_slug(&state, &updated.previous_slug).await;
    if updated.slug_changed() {
        invalidate_slug(&state, &updated.link.slug).await;
    }

    Ok(Json(to_response(&state, updated.link)))
}

/// Deletes one of the caller's links together with its clicks.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist or belongs to another user.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, AppError> {
    let link = state.link_service.delete_link(user.id, id).await?;

    invalidate_slug(&state, &link.slug).await;

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn to_response(state: &AppState, link: Link) -> LinkResponse {
    let short_url = state
        .link_service
        .short_url(&state.public_base_url, &link.slug);
    LinkResponse::new(link, short_url)
}

async fn invalidate_slug(state: &AppState, slug: &str) {
    if let Err(e) = state.cache.invalidate(slug).await {
        warn!(error = %e, slug, "Failed to invalidate cached link");
    }
}
