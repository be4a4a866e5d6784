//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, the rate limit sweeper, and Axum
//! server lifecycle.

use crate::application::services::{AuthService, LinkService, StatsService};
use crate::config::Config;
use crate::domain::rate_limiter::RateLimiter;
use crate::domain::repositories::{ClickRepository, LinkRepository, TokenRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::geo::NullGeoLocator;
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository, PgTokenRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Background sweeper for expired rate limit windows
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let click_repository: Arc<dyn ClickRepository> =
        Arc::new(PgClickRepository::new(pool.clone()));
    let token_repository: Arc<dyn TokenRepository> =
        Arc::new(PgTokenRepository::new(pool.clone()));

    let rate_limiter = Arc::new(RateLimiter::new());
    tokio::spawn(sweep_rate_limits(
        rate_limiter.clone(),
        Duration::from_secs(config.rate_limit_sweep_seconds),
    ));
    tracing::info!("Rate limit sweeper started");

    let state = AppState {
        link_service: Arc::new(LinkService::new(link_repository)),
        stats_service: Arc::new(StatsService::new(click_repository)),
        auth_service: Arc::new(AuthService::new(
            token_repository,
            config.token_signing_secret.clone(),
        )),
        rate_limiter,
        cache,
        geo: Arc::new(NullGeoLocator),
        public_base_url: config.public_base_url.clone(),
        behind_proxy: config.behind_proxy,
        admin_emails: Arc::new(config.admin_emails.iter().cloned().collect()),
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Drops expired limiter windows every `every`, forever.
async fn sweep_rate_limits(limiter: Arc<RateLimiter>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let purged = limiter.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, tracked = limiter.tracked(), "Expired rate limit windows dropped");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
