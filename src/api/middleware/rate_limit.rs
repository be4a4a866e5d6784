//! Per-route rate limiting backed by the shared fixed-window limiter.
//!
//! Wrap a route with [`enforce`] through `from_fn_with_state` and a
//! [`RateLimitGuard`] naming the policy. Routes without a guard are exempt.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::net::IpAddr;
use std::sync::Arc;

use super::identity::{ClientIp, CurrentUser};
use crate::domain::rate_limiter::{RateLimitPolicy, RateLimiter};
use crate::error::AppError;

/// Identifier used when the client address is unknown.
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Clone)]
pub struct RateLimitGuard {
    limiter: Arc<RateLimiter>,
    policy: RateLimitPolicy,
}

impl RateLimitGuard {
    pub fn new(limiter: Arc<RateLimiter>, policy: RateLimitPolicy) -> Self {
        Self { limiter, policy }
    }
}

/// Builds the limiter key: the client address, refined by user id when a
/// verified identity is attached.
pub fn identifier_for(ip: Option<IpAddr>, user_id: Option<i64>) -> String {
    let base = ip.map_or_else(|| UNKNOWN_CLIENT.to_string(), |ip| ip.to_string());
    match user_id {
        Some(id) => format!("{base}:user:{id}"),
        None => base,
    }
}

/// Counts the request against the guard's policy before running the handler.
///
/// # Errors
///
/// Returns `429 Too Many Requests` with `Retry-After` once the window's budget
/// is spent.
pub async fn enforce(
    State(guard): State<RateLimitGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = req.extensions().get::<ClientIp>().and_then(|c| c.0);
    let user_id = req.extensions().get::<CurrentUser>().map(|u| u.0.id);
    let identifier = identifier_for(ip, user_id);

    if !guard.limiter.check_policy(&identifier, &guard.policy) {
        let info = guard.limiter.inspect(&identifier);
        let retry_after = info.time_to_reset.as_secs_f64().ceil() as u64;
        tracing::debug!(
            identifier = %identifier,
            policy = guard.policy.name,
            retry_after,
            "Request throttled"
        );
        return Err(AppError::too_many_requests(retry_after.max(1)));
    }

    Ok(next.run(req).await)
}
