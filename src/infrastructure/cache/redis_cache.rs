//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

const KEY_PREFIX: &str = "link:";

/// Redis cache storing [`CachedLink`] entries as JSON strings.
///
/// Uses `ConnectionManager` for connection reuse and reconnects.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` comes from `CACHE_TTL_SECONDS`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {e}"))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {e}")))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {e}")))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn build_key(slug: &str) -> String {
        format!("{KEY_PREFIX}{slug}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, slug: &str) -> CacheResult<Option<CachedLink>> {
        let mut conn = self.client.clone();

        let raw = match conn.get::<_, Option<String>>(Self::build_key(slug)).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(slug, error = %e, "Redis GET failed");
                return Ok(None);
            }
        };

        match raw.map(|json| serde_json::from_str::<CachedLink>(&json)) {
            Some(Ok(entry)) => {
                debug!(slug, "Cache HIT");
                Ok(Some(entry))
            }
            Some(Err(e)) => {
                warn!(slug, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            }
            None => {
                debug!(slug, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        slug: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let json =
            serde_json::to_string(link).map_err(|e| CacheError::OperationError(e.to_string()))?;
        let mut conn = self.client.clone();

        match conn
            .set_ex::<_, _, ()>(Self::build_key(slug), json, ttl)
            .await
        {
            Ok(()) => debug!(slug, ttl, "Cache SET"),
            Err(e) => warn!(slug, error = %e, "Redis SET failed"),
        }
        Ok(())
    }

    async fn invalidate(&self, slug: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(Self::build_key(slug)).await {
            Ok(deleted) if deleted > 0 => debug!(slug, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(slug, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
