//! Handler for the authenticated profile endpoint.

use axum::Json;

use crate::api::dto::auth::ProfileResponse;
use crate::api::middleware::CurrentUser;

/// Returns the user behind the bearer token.
///
/// # Endpoint
///
/// `GET /api/auth/me`
///
/// # Errors
///
/// Returns 401 Unauthorized if no valid token was presented.
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<ProfileResponse> {
    Json(user.into())
}
