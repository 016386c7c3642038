//! Wall-clock abstraction
//!
//! Both timers are anchor-based: they store an instant and derive
//! elapsed/remaining by subtraction at read time. Injecting the clock lets
//! tests drive those derivations deterministically.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Whole seconds elapsed since `start`, clamped at zero
pub fn elapsed_secs(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_seconds().max(0)
}

/// Whole seconds remaining until `end`, clamped at zero
pub fn remaining_secs(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (end - now).num_seconds().max(0)
}

/// System wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and simulations
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance_secs(&self, seconds: i64) {
        self.advance(Duration::seconds(seconds));
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance_secs(65);
        assert_eq!(elapsed_secs(start, clock.now()), 65);
    }

    #[test]
    fn derivations_clamp_at_zero() {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let later = t + Duration::seconds(30);

        assert_eq!(elapsed_secs(later, t), 0);
        assert_eq!(remaining_secs(t, later), 0);
        assert_eq!(remaining_secs(later, t), 30);
    }
}
