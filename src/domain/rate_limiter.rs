//! Fixed-window request counting per client identifier.
//!
//! Each identifier owns one record holding a hit counter and the instant its window
//! ends. A request after that instant starts a fresh window. Records live in a
//! sharded [`DashMap`], so updates on one key serialize on that key's shard while
//! other keys proceed in parallel.
//!
//! The limiter is fail-open: internal faults are logged and the request is admitted.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::domain::clock::{Clock, SystemClock};

/// Request budget applied to a class of endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub name: &'static str,
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn new(name: &'static str, limit: u32, window_secs: u64) -> Self {
        Self {
            name,
            limit,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Credential and administrative endpoints.
pub const AUTH: RateLimitPolicy = RateLimitPolicy::new("auth", 5, 60);
/// Link creation.
pub const LINK_CREATION: RateLimitPolicy = RateLimitPolicy::new("link_creation", 20, 60);
/// Public redirects.
pub const LINK_ACCESS: RateLimitPolicy = RateLimitPolicy::new("link_access", 100, 60);
/// Every other API endpoint.
pub const GENERAL: RateLimitPolicy = RateLimitPolicy::new("general", 10, 60);

#[derive(Debug, Clone, PartialEq, Eq)]
struct RateLimitRecord {
    hits: u32,
    reset_at: DateTime<Utc>,
    limit: u32,
}

impl RateLimitRecord {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.reset_at
    }
}

/// Read-only view of an identifier's current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub hits: u32,
    pub remaining: u32,
    pub time_to_reset: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum LimiterError {
    #[error("window of {0:?} cannot be represented")]
    WindowOutOfRange(Duration),

    #[error("window end overflows the calendar")]
    ResetOverflow,
}

pub struct RateLimiter<C = SystemClock> {
    records: DashMap<String, RateLimitRecord>,
    clock: C,
}

impl RateLimiter<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for RateLimiter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Counts a request against `identifier` and reports whether it is admitted.
    ///
    /// Never fails: an internal fault admits the request.
    pub fn check(&self, identifier: &str, window: Duration, limit: u32) -> bool {
        match self.try_check(identifier, window, limit) {
            Ok(true) => true,
            Ok(false) => {
                warn!(identifier, limit, "Rate limit exceeded");
                false
            }
            Err(e) => {
                error!(identifier, error = %e, "Rate limiter fault, admitting request");
                true
            }
        }
    }

    /// Applies `policy` to `identifier`.
    pub fn check_policy(&self, identifier: &str, policy: &RateLimitPolicy) -> bool {
        self.check(identifier, policy.window, policy.limit)
    }

    /// Fallible core of [`check`](Self::check).
    pub fn try_check(
        &self,
        identifier: &str,
        window: Duration,
        limit: u32,
    ) -> Result<bool, LimiterError> {
        let now = self.clock.now();
        let span =
            chrono::Duration::from_std(window).map_err(|_| LimiterError::WindowOutOfRange(window))?;
        let next_reset = now
            .checked_add_signed(span)
            .ok_or(LimiterError::ResetOverflow)?;
        let fresh = RateLimitRecord {
            hits: 1,
            reset_at: next_reset,
            limit,
        };

        match self.records.entry(identifier.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(fresh);
                Ok(true)
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if record.is_expired(now) {
                    *record = fresh;
                    return Ok(true);
                }
                record.limit = limit;
                if record.hits < limit {
                    record.hits = record.hits.saturating_add(1);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Reports the current window without counting a request.
    ///
    /// `remaining` is computed against the limit last applied to this identifier.
    pub fn inspect(&self, identifier: &str) -> RateLimitInfo {
        let now = self.clock.now();
        match self.records.get(identifier) {
            Some(record) if !record.is_expired(now) => RateLimitInfo {
                hits: record.hits,
                remaining: record.limit.saturating_sub(record.hits),
                time_to_reset: (record.reset_at - now).to_std().unwrap_or_default(),
            },
            Some(record) => RateLimitInfo {
                hits: 0,
                remaining: record.limit,
                time_to_reset: Duration::ZERO,
            },
            None => RateLimitInfo {
                hits: 0,
                remaining: 0,
                time_to_reset: Duration::ZERO,
            },
        }
    }

    /// Drops the record for `identifier`; the next request starts a new window.
    pub fn reset(&self, identifier: &str) {
        let existed = self.records.remove(identifier).is_some();
        info!(identifier, existed, "Rate limit reset");
    }

    /// Removes every expired record and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        before.saturating_sub(self.records.len())
    }

    pub fn tracked(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use std::sync::Arc;

    fn manual() -> (RateLimiter<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        (RateLimiter::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_admits_up_to_limit_then_rejects() {
        let (limiter, _) = manual();
        let window = Duration::from_secs(60);

        for _ in 0..5 {
            assert!(limiter.check("a", window, 5));
        }
        assert!(!limiter.check("a", window, 5));

        let info = limiter.inspect("a");
        assert_eq!(info.hits, 5);
        assert_eq!(info.remaining, 0);
    }

    #[test]
    fn test_rejection_does_not_count() {
        let (limiter, _) = manual();
        let window = Duration::from_secs(60);

        assert!(limiter.check("a", window, 1));
        assert!(!limiter.check("a", window, 1));
        assert!(!limiter.check("a", window, 1));

        assert_eq!(limiter.inspect("a").hits, 1);
    }

    #[test]
    fn test_window_rollover_with_manual_clock() {
        let (limiter, clock) = manual();
        let window = Duration::from_millis(100);

        assert!(limiter.check("a", window, 1));
        assert!(!limiter.check("a", window, 1));

        clock.advance(chrono::Duration::milliseconds(100));
        assert!(!limiter.check("a", window, 1), "boundary instant is still inside");

        clock.advance(chrono::Duration::milliseconds(50));
        assert!(limiter.check("a", window, 1));
        assert_eq!(limiter.inspect("a").hits, 1);
    }

    #[test]
    fn test_window_rollover_with_system_clock() {
        let limiter = RateLimiter::new();
        let window = Duration::from_millis(100);

        assert!(limiter.check("k", window, 1));
        assert!(!limiter.check("k", window, 1));

        std::thread::sleep(Duration::from_millis(150));

        assert!(limiter.check("k", window, 1));
        assert_eq!(limiter.inspect("k").hits, 1);
    }

    #[test]
    fn test_reset_starts_new_window() {
        let (limiter, _) = manual();
        let window = Duration::from_secs(60);

        assert!(limiter.check("a", window, 1));
        assert!(!limiter.check("a", window, 1));

        limiter.reset("a");

        assert!(limiter.check("a", window, 1));
        limiter.reset("never-seen");
    }

    #[test]
    fn test_identifiers_are_independent() {
        let (limiter, _) = manual();
        let window = Duration::from_secs(60);

        assert!(limiter.check("1.2.3.4", window, 1));
        assert!(!limiter.check("1.2.3.4", window, 1));
        assert!(limiter.check("1.2.3.4:user:7", window, 1));
    }

    #[test]
    fn test_inspect_absent_and_expired() {
        let (limiter, clock) = manual();
        assert_eq!(
            limiter.inspect("nobody"),
            RateLimitInfo {
                hits: 0,
                remaining: 0,
                time_to_reset: Duration::ZERO
            }
        );

        limiter.check("a", Duration::from_secs(10), 4);
        let info = limiter.inspect("a");
        assert_eq!(info.hits, 1);
        assert_eq!(info.remaining, 3);
        assert_eq!(info.time_to_reset, Duration::from_secs(10));

        clock.advance(chrono::Duration::seconds(11));
        let info = limiter.inspect("a");
        assert_eq!(info.hits, 0);
        assert_eq!(info.remaining, 4);
        assert_eq!(info.time_to_reset, Duration::ZERO);
    }

    #[test]
    fn test_inspect_does_not_mutate() {
        let (limiter, _) = manual();
        limiter.check("a", Duration::from_secs(60), 3);
        for _ in 0..10 {
            limiter.inspect("a");
        }
        assert_eq!(limiter.inspect("a").hits, 1);
    }

    #[test]
    fn test_unrepresentable_window_fails_open() {
        let (limiter, _) = manual();
        let huge = Duration::from_secs(u64::MAX);

        assert!(limiter.try_check("a", huge, 1).is_err());
        assert!(limiter.check("a", huge, 1));
        assert!(limiter.check("a", huge, 1));
    }

    #[test]
    fn test_purge_expired() {
        let (limiter, clock) = manual();
        limiter.check("short", Duration::from_secs(1), 5);
        limiter.check("long", Duration::from_secs(60), 5);

        clock.advance(chrono::Duration::seconds(2));

        assert_eq!(limiter.purge_expired(), 1);
        assert_eq!(limiter.tracked(), 1);
        assert_eq!(limiter.inspect("long").hits, 1);
    }

    #[test]
    fn test_concurrent_checks_never_exceed_limit() {
        let limiter = Arc::new(RateLimiter::new());
        let window = Duration::from_secs(60);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|_| limiter.check("shared", window, 100))
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(admitted, 100);
        assert_eq!(limiter.inspect("shared").hits, 100);
    }

    #[test]
    fn test_policy_table() {
        assert_eq!((AUTH.limit, AUTH.window.as_secs()), (5, 60));
        assert_eq!((LINK_CREATION.limit, LINK_CREATION.window.as_secs()), (20, 60));
        assert_eq!((LINK_ACCESS.limit, LINK_ACCESS.window.as_secs()), (100, 60));
        assert_eq!((GENERAL.limit, GENERAL.window.as_secs()), (10, 60));
    }
}
