//! Cooldown gate deciding whether a new alert may fire.

mod cooldown;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use cooldown::{DEFAULT_COOLDOWN, parse_cooldown};

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::state::RunState;

/// Rate limit between consecutive alert dispatches.
///
/// Errors while evaluating the cooldown permit the alert: a duplicate
/// notification is preferred over a missed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertGate {
    cooldown: Duration,
}

impl AlertGate {
    /// Creates a gate with the given cooldown.
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Creates a gate from a human cooldown string such as `"2h30m"`.
    #[must_use]
    pub fn from_notation(text: &str) -> Self {
        Self::new(parse_cooldown(text))
    }

    /// Returns the configured cooldown.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Decides whether an alert may be sent at `now`.
    ///
    /// - No previous alert: permitted.
    /// - Otherwise permitted iff `now - last_alert_time >= cooldown`.
    /// - A previous alert dated after `now` cannot be evaluated: permitted.
    #[must_use]
    pub fn may_alert(&self, state: &RunState, now: DateTime<Utc>) -> bool {
        let Some(last) = state.last_alert_time else {
            return true;
        };

        match (now - last).to_std() {
            Ok(elapsed) => {
                let permitted = elapsed >= self.cooldown;
                if !permitted {
                    tracing::info!(
                        "Alert suppressed by cooldown: {}s elapsed of {}s",
                        elapsed.as_secs(),
                        self.cooldown.as_secs()
                    );
                }
                permitted
            }
            Err(_) => {
                tracing::warn!("Last alert time {last} is in the future; allowing alert");
                true
            }
        }
    }

    /// Time left before the next alert is permitted, if any.
    #[must_use]
    pub fn remaining(&self, state: &RunState, now: DateTime<Utc>) -> Option<Duration> {
        let last = state.last_alert_time?;
        let elapsed = (now - last).to_std().ok()?;
        self.cooldown
            .checked_sub(elapsed)
            .filter(|left| !left.is_zero())
    }
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
