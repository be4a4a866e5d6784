//! Handler for short link redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::{debug, error};

use crate::api::middleware::ClientIp;
use crate::domain::entities::NewClick;
use crate::error::AppError;
use crate::infrastructure::cache::CachedLink;
use crate::state::AppState;

/// Redirects a slug to its destination URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Check cache for the slug
/// 2. On cache miss, query database and spawn an async cache write
/// 3. Reject deactivated links
/// 4. Record the click with client address, user agent, referer and location
/// 5. Return 302 Found
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
/// Returns 400 Bad Request if the link is deactivated.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let cached = match state.cache.get_link(&slug).await {
        Ok(Some(hit)) => {
            debug!(slug = %slug, "Cache HIT");
            hit
        }
        Ok(None) => {
            debug!(slug = %slug, "Cache MISS");
            lookup_and_cache(&state, &slug).await?
        }
        Err(e) => {
            error!(error = %e, "Cache error");
            let link = state.link_service.resolve_slug(&slug).await?;
            CachedLink::from(&link)
        }
    };

    if !cached.is_active {
        return Err(AppError::bad_request(
            "Link is inactive",
            json!({ "slug": slug, "reason": "link_inactive" }),
        ));
    }

    let location = match ip {
        Some(ip) => state.geo.locate(ip).await.unwrap_or_default(),
        None => Default::default(),
    };

    state
        .stats_service
        .record_click(NewClick {
            link_id: cached.link_id,
            ip: ip.map(|ip| ip.to_string()),
            user_agent: header_value(&headers, header::USER_AGENT),
            referer: header_value(&headers, header::REFERER),
            country: location.country,
            city: location.city,
        })
        .await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, cached.long_url)]))
}

async fn lookup_and_cache(state: &AppState, slug: &str) -> Result<CachedLink, AppError> {
    let link = state.link_service.resolve_slug(slug).await?;
    let entry = CachedLink::from(&link);

    let cache = state.cache.clone();
    let key = slug.to_string();
    let value = entry.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.set_link(&key, &value, None).await {
            error!(error = %e, "Failed to cache link");
        }
    });

    Ok(entry)
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
