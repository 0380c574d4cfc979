use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;

use crate::clock::Clock;

pub const DEFAULT_QUOTA: u32 = 3;
pub const DEFAULT_WINDOW_SECS: u64 = 60 * 60;

// Rate limit entry - tracks registrations per email
#[derive(Debug, Clone)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: DateTime<Utc>,
}

/// Fixed-window limiter keyed by identifier (an email in practice).
///
/// The table is owned by the limiter instance. Each check holds the shard
/// lock for its key across the whole read-modify-write, so two concurrent
/// requests for the same identifier can never both take the last slot.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    quota: u32,
    window: TimeDelta,
    clock: Arc<dyn Clock>,
}

// Window length from a seconds setting, None when it does not fit a TimeDelta
pub fn window_from_secs(secs: u64) -> Option<TimeDelta> {
    i64::try_from(secs).ok().and_then(TimeDelta::try_seconds)
}

impl RateLimiter {
    pub fn new(quota: u32, window: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            quota,
            window,
            clock,
        }
    }

    // Admit or reject one request from `identifier`, recording it if admitted
    pub fn check_and_record(&self, identifier: &str) -> bool {
        let now = self.clock.now();

        // drop every entry whose window is over
        self.sweep(now);

        let mut occupied = match self.entries.entry(identifier.to_string()) {
            Entry::Occupied(occupied) => occupied,
            Entry::Vacant(slot) => {
                slot.insert(RateLimitEntry {
                    count: 1,
                    window_start: now,
                });
                return true;
            }
        };
        let entry = occupied.get_mut();

        // window expired..? start a new one
        if now - entry.window_start > self.window {
            entry.count = 1;
            entry.window_start = now;
            return true;
        }

        // under limit.? allow
        if entry.count < self.quota {
            entry.count += 1;
            return true;
        }

        debug!(count = entry.count, quota = self.quota, "Quota exhausted");
        false
    }

    // Number of identifiers currently tracked
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    fn sweep(&self, now: DateTime<Utc>) {
        self.entries
            .retain(|_, entry| now - entry.window_start <= self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn limiter() -> (RateLimiter, Arc<ManualClock>) {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let limiter = RateLimiter::new(
            DEFAULT_QUOTA,
            window_from_secs(DEFAULT_WINDOW_SECS).unwrap(),
            clock.clone(),
        );
        (limiter, clock)
    }

    #[test]
    fn test_three_immediate_calls_pass_fourth_fails() {
        let (limiter, _) = limiter();

        assert!(limiter.check_and_record("a@b.com"));
        assert!(limiter.check_and_record("a@b.com"));
        assert!(limiter.check_and_record("a@b.com"));
        assert!(!limiter.check_and_record("a@b.com"));
    }

    #[test]
    fn test_stays_exhausted_within_window() {
        let (limiter, clock) = limiter();

        for _ in 0..3 {
            assert!(limiter.check_and_record("atleta@boxe.pt"));
        }
        clock.advance(TimeDelta::minutes(30));
        assert!(!limiter.check_and_record("atleta@boxe.pt"));
        clock.advance(TimeDelta::minutes(30));
        // exactly one hour after the window start is still inside it
        assert!(!limiter.check_and_record("atleta@boxe.pt"));
    }

    #[test]
    fn test_new_window_after_expiry() {
        let (limiter, clock) = limiter();

        for _ in 0..3 {
            assert!(limiter.check_and_record("clube@boxe.pt"));
        }
        clock.advance(TimeDelta::hours(1) + TimeDelta::seconds(1));

        // fresh window: three more pass, the fourth fails
        assert!(limiter.check_and_record("clube@boxe.pt"));
        assert!(limiter.check_and_record("clube@boxe.pt"));
        assert!(limiter.check_and_record("clube@boxe.pt"));
        assert!(!limiter.check_and_record("clube@boxe.pt"));
    }

    #[test]
    fn test_identifiers_are_independent() {
        let (limiter, _) = limiter();

        for _ in 0..3 {
            assert!(limiter.check_and_record("one@boxe.pt"));
        }
        assert!(!limiter.check_and_record("one@boxe.pt"));
        assert!(limiter.check_and_record("two@boxe.pt"));
    }

    #[test]
    fn test_sweep_drops_expired_entries() {
        let (limiter, clock) = limiter();

        limiter.check_and_record("old@boxe.pt");
        limiter.check_and_record("older@boxe.pt");
        assert_eq!(limiter.tracked(), 2);

        clock.advance(TimeDelta::hours(2));
        limiter.check_and_record("new@boxe.pt");
        assert_eq!(limiter.tracked(), 1);
    }

    #[test]
    fn test_window_from_secs() {
        assert_eq!(window_from_secs(DEFAULT_WINDOW_SECS), Some(TimeDelta::hours(1)));
        assert_eq!(window_from_secs(0), Some(TimeDelta::zero()));
        assert_eq!(window_from_secs(u64::MAX), None);
        assert_eq!(window_from_secs(i64::MAX as u64), None);
    }

    #[test]
    fn test_concurrent_callers_never_exceed_quota() {
        let (limiter, _) = limiter();
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || limiter.check_and_record("race@boxe.pt"))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(admitted, DEFAULT_QUOTA as usize);
    }
}
