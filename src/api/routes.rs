//! API route configuration.
//!
//! Every endpoint here expects a bearer token; handlers extract
//! [`crate::api::middleware::CurrentUser`] and answer 401 without one.

use axum::{
    Router, middleware,
    routing::{MethodRouter, get, post},
};

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, inspect_handler,
    list_links_handler, me_handler, reset_handler, stats_handler, update_link_handler,
};
use crate::api::middleware::RateLimitGuard;
use crate::api::middleware::rate_limit::enforce;
use crate::domain::rate_limiter::{AUTH, GENERAL, LINK_CREATION, RateLimitPolicy};
use crate::state::AppState;

/// All API routes with their rate limit policies.
///
/// # Endpoints
///
/// - `GET    /auth/me`                   - Current user profile (not limited)
/// - `POST   /links`                     - Create a link (`link_creation`)
/// - `GET    /links`                     - List own links (`general`)
/// - `GET    /links/{id}`                - Link with recent clicks (`general`)
/// - `PUT    /links/{id}`                - Partially update a link (`general`)
/// - `DELETE /links/{id}`                - Delete a link (`general`)
/// - `GET    /links/{id}/stats`          - Click statistics (`general`)
/// - `GET    /rate-limits/{identifier}`  - Inspect a limiter window (`auth`, admin only)
/// - `DELETE /rate-limits/{identifier}`  - Clear a limiter window (`auth`, admin only)
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me_handler))
        .route(
            "/links",
            limited(post(create_link_handler), state, LINK_CREATION)
                .merge(limited(get(list_links_handler), state, GENERAL)),
        )
        .route(
            "/links/{id}",
            limited(
                get(get_link_handler)
                    .put(update_link_handler)
                    .delete(delete_link_handler),
                state,
                GENERAL,
            ),
        )
        .route(
            "/links/{id}/stats",
            limited(get(stats_handler), state, GENERAL),
        )
        .route(
            "/rate-limits/{identifier}",
            limited(get(inspect_handler).delete(reset_handler), state, AUTH),
        )
}

/// Wraps a method router with the limiter under `policy`.
pub(crate) fn limited(
    route: MethodRouter<AppState>,
    state: &AppState,
    policy: RateLimitPolicy,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        RateLimitGuard::new(state.rate_limiter.clone(), policy),
        enforce,
    ))
}
