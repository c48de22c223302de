//! Injected time source.
//!
//! Eligibility windows, bucket cutoffs, and the daily shuffle seed all depend
//! on "now". The core functions take an explicit timestamp; [`Clock`] is the
//! seam the [`FeedEngine`](crate::feed::FeedEngine) facade uses so callers
//! (and tests) control which "now" that is.

use chrono::{DateTime, Utc};

/// Source of the current timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed timestamp, for deterministic tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_returns_given_instant() {
        let instant = "2026-03-15T12:00:00Z".parse().unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}
