//! HTTP middleware for request processing and protection.
//!
//! - [`identity`] - Client address and bearer token resolution
//! - [`rate_limit`] - Per-route fixed-window throttling
//! - [`tracing`] - Request spans and latency logging

pub mod identity;
pub mod rate_limit;
pub mod tracing;

pub use identity::{AdminUser, ClientIp, CurrentUser};
pub use rate_limit::RateLimitGuard;
