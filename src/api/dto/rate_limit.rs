//! DTO for rate limit inspection.

use serde::Serialize;

use crate::domain::rate_limiter::RateLimitInfo;

#[derive(Debug, Serialize)]
pub struct RateLimitInfoResponse {
    pub identifier: String,
    pub hits: u32,
    pub remaining: u32,
    pub time_to_reset_ms: u64,
}

impl RateLimitInfoResponse {
    pub fn new(identifier: String, info: RateLimitInfo) -> Self {
        Self {
            identifier,
            hits: info.hits,
            remaining: info.remaining,
            time_to_reset_ms: u64::try_from(info.time_to_reset.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
