//! Handler for link statistics endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::api::handlers::links::to_response;
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click statistics for one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/links/{id}/stats`
///
/// # Response
///
/// ```json
/// {
///   "link": { "id": 1, "slug": "promo", "short_url": "http://localhost:3000/promo", ... },
///   "stats": {
///     "total_clicks": 42,
///     "today_clicks": 3,
///     "last_7_days_clicks": 17,
///     "top_referrers": [{ "referrer": "https://news.ycombinator.com/", "count": 9 }],
///     "top_countries": [{ "country": "DE", "count": 12 }],
///     "recent_clicks": [ ... ]
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist or belongs to another user.
pub async fn stats_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<StatsResponse>, AppError> {
    let link = state.link_service.get_link(user.id, id).await?;
    let summary = state.stats_service.summary(link.id).await?;

    Ok(Json(StatsResponse {
        link: to_response(&state, link),
        stats: summary.into(),
    }))
}
