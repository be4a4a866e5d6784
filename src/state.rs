use std::collections::HashSet;
use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::domain::rate_limiter::RateLimiter;
use crate::domain::repositories::{ClickRepository, LinkRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::geo::GeoLocator;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub stats_service: Arc<StatsService<dyn ClickRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub cache: Arc<dyn CacheService>,
    pub geo: Arc<dyn GeoLocator>,
    /// Origin that short URLs are built on, without a trailing slash.
    pub public_base_url: String,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
    /// Lowercased emails allowed to use the rate limit administration routes.
    pub admin_emails: Arc<HashSet<String>>,
}

impl AppState {
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.to_lowercase())
    }
}
