//! Cache service trait and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Link;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// What the redirect path needs to know about a slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLink {
    pub link_id: i64,
    pub long_url: String,
    pub is_active: bool,
}

impl From<&Link> for CachedLink {
    fn from(link: &Link) -> Self {
        Self {
            link_id: link.id,
            long_url: link.long_url.clone(),
            is_active: link.is_active,
        }
    }
}

/// Slug-keyed cache in front of the link store.
///
/// Implementations are fail-open: backend errors are logged and reported as a
/// miss or a successful no-op, so a broken cache degrades to database lookups.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss or backend error
    async fn get_link(&self, slug: &str) -> CacheResult<Option<CachedLink>>;

    /// Stores an entry, using the implementation's default TTL when `ttl_seconds`
    /// is `None`.
    async fn set_link(
        &self,
        slug: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes an entry after the link was changed or deleted.
    async fn invalidate(&self, slug: &str) -> CacheResult<()>;

    async fn health_check(&self) -> bool;
}
