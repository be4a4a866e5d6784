//! Handlers for inspecting and clearing rate limit windows.
//!
//! Both are restricted to administrators; other users get 403.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::api::dto::rate_limit::RateLimitInfoResponse;
use crate::api::middleware::AdminUser;
use crate::state::AppState;

/// Reports the current window for an identifier without counting a request.
///
/// # Endpoint
///
/// `GET /api/rate-limits/{identifier}`
///
/// An identifier with no window reports zero hits and zero remaining.
pub async fn inspect_handler(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Json<RateLimitInfoResponse> {
    let info = state.rate_limiter.inspect(&identifier);
    Json(RateLimitInfoResponse::new(identifier, info))
}

/// Clears the window for an identifier.
///
/// # Endpoint
///
/// `DELETE /api/rate-limits/{identifier}`
pub async fn reset_handler(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> StatusCode {
    state.rate_limiter.reset(&identifier);
    info!(identifier = %identifier, admin_id = admin.id, "Rate limit cleared via API");
    StatusCode::NO_CONTENT
}
