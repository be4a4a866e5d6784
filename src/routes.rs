//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`  - Short link redirect (public, `link_access` policy)
//! - `GET  /health`  - Health check: DB and cache (public, not limited)
//! - `/api/*`        - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Identity** - Client address and optional bearer token user
//! - **Rate limiting** - Fixed-window counters per route policy
//! - **Path normalization** - Trailing slash handling

use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{identity, tracing};
use crate::api::routes::limited;
use crate::domain::rate_limiter::LINK_ACCESS;
use crate::state::AppState;

/// Builds the routed application without path normalization.
pub fn router(state: AppState) -> Router {
    let api_router = api::routes::api_routes(&state);

    Router::new()
        .route(
            "/{slug}",
            limited(get(redirect_handler), &state, LINK_ACCESS),
        )
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .layer(middleware::from_fn_with_state(state.clone(), identity::layer))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/api/links/` and
/// `/api/links` reach the same handler.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
