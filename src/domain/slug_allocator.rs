//! Slug allocation: picks a short identifier that is not yet in use.
//!
//! Caller-supplied candidates are checked once. Generated slugs are drawn from the
//! 62-symbol alphanumeric alphabet and retried a bounded number of times; when every
//! draw collides, a time-derived fallback is returned unchecked and the storage unique
//! constraint settles any remaining race at write time.

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Symbols used for generated slugs.
pub const SLUG_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a generated slug.
pub const GENERATED_SLUG_LEN: usize = 8;

/// Random draws attempted before switching to the fallback slug.
pub const MAX_RANDOM_ATTEMPTS: usize = 10;

/// Random symbols prefixed to the timestamp in the fallback slug.
const FALLBACK_PREFIX_LEN: usize = 4;

/// Upper bound on the fallback slug length.
pub const FALLBACK_MAX_LEN: usize = 12;

/// Answers whether a slug is already stored.
#[async_trait]
pub trait SlugAvailability: Send + Sync {
    async fn exists(&self, slug: &str) -> Result<bool, AppError>;
}

#[async_trait]
impl<T: LinkRepository + ?Sized> SlugAvailability for T {
    async fn exists(&self, slug: &str) -> Result<bool, AppError> {
        self.exists_by_slug(slug).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// A caller-supplied slug is already in use.
    #[error("slug '{slug}' is already taken")]
    SlugTaken { slug: String },

    /// Generated slugs kept colliding at write time.
    #[error("no free slug found after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::SlugTaken { slug } => {
                AppError::conflict("This slug is already taken", json!({ "slug": slug }))
            }
            AllocationError::Exhausted { attempts } => AppError::unavailable(
                "Could not allocate a short link, try again",
                json!({ "attempts": attempts }),
            ),
            AllocationError::Storage(e) => e,
        }
    }
}

/// Allocates unique slugs against a [`SlugAvailability`] source.
pub struct SlugAllocator<A: ?Sized, C = SystemClock> {
    store: Arc<A>,
    clock: C,
}

impl<A: SlugAvailability + ?Sized> SlugAllocator<A, SystemClock> {
    pub fn new(store: Arc<A>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<A, C> SlugAllocator<A, C>
where
    A: SlugAvailability + ?Sized,
    C: Clock,
{
    pub fn with_clock(store: Arc<A>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Returns a slug that was free at check time.
    ///
    /// With `Some(candidate)` the candidate is checked exactly once and returned
    /// unchanged if free. With `None` a random slug is generated; the result may
    /// be the unchecked fallback when all random draws collided.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::SlugTaken`] when the candidate already exists
    /// - [`AllocationError::Storage`] when the availability check fails
    pub async fn allocate(&self, candidate: Option<&str>) -> Result<String, AllocationError> {
        if let Some(slug) = candidate {
            if self.store.exists(slug).await? {
                return Err(AllocationError::SlugTaken {
                    slug: slug.to_string(),
                });
            }
            return Ok(slug.to_string());
        }

        for attempt in 1..=MAX_RANDOM_ATTEMPTS {
            let slug = random_slug(GENERATED_SLUG_LEN);
            if !self.store.exists(&slug).await? {
                return Ok(slug);
            }
            debug!(attempt, slug = %slug, "Generated slug collided");
        }

        let fallback = fallback_slug(self.clock.now().timestamp_millis());
        warn!(
            attempts = MAX_RANDOM_ATTEMPTS,
            slug = %fallback,
            "Random slug draws exhausted, using timestamp fallback"
        );
        Ok(fallback)
    }
}

/// Draws `len` symbols uniformly from [`SLUG_ALPHABET`].
pub fn random_slug(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| SLUG_ALPHABET[rng.random_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}

fn fallback_slug(unix_millis: i64) -> String {
    let mut slug = random_slug(FALLBACK_PREFIX_LEN);
    slug.push_str(&to_base36(unix_millis.unsigned_abs()));
    slug.truncate(FALLBACK_MAX_LEN);
    slug
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
