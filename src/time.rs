//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting manual clocks
//! in tests while using the real system clock in production.

use chrono::{DateTime, Utc};

/// Abstraction over wall-clock time.
///
/// # Example
///
/// ```
/// use vpn_watch::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now.timestamp() > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock delegating to [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests.
#[cfg(test)]
pub mod mock {
    use super::Clock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// A clock whose time only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        secs: AtomicI64,
    }

    impl ManualClock {
        /// Creates a clock reading `secs` seconds after the Unix epoch.
        pub const fn at(secs: i64) -> Self {
            Self {
                secs: AtomicI64::new(secs),
            }
        }

        /// Moves the clock forward.
        pub fn advance(&self, by: Duration) {
            self.secs.fetch_add(by.num_seconds(), Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.timestamp_opt(self.secs.load(Ordering::SeqCst), 0)
                .single()
                .unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::ManualClock;
    use super::*;
    use chrono::Duration;

    #[test]
    fn system_clock_returns_current_time() {
        let before = Utc::now();
        let result = SystemClock.now();
        let after = Utc::now();

        assert!(result >= before);
        assert!(result <= after);
    }

    #[test]
    fn system_clock_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SystemClock>();
    }

    #[test]
    fn manual_clock_returns_controlled_time() {
        let clock = ManualClock::at(1_000_000);
        assert_eq!(clock.now().timestamp(), 1_000_000);
    }

    #[test]
    fn manual_clock_can_advance() {
        let clock = ManualClock::at(0);

        clock.advance(Duration::seconds(100));
        assert_eq!(clock.now().timestamp(), 100);

        clock.advance(Duration::minutes(1));
        assert_eq!(clock.now().timestamp(), 160);
    }
}
