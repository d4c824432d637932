//! Results reported by a check and by the status query.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::ProtectedRange;
use crate::state::RunState;

/// What happened to the alert of an unsafe check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertOutcome {
    /// The cooldown has not elapsed.
    Suppressed,
    /// The webhook accepted the alert.
    Sent,
    /// The webhook call failed; counters were left alone.
    Failed,
    /// Dry-run: the alert was logged instead of sent.
    DryRun,
}

/// Result of one monitoring pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No endpoint produced an address. Only `total_checks` moved.
    DiscoveryFailed,

    /// The address is outside every protected range.
    Safe {
        /// Resolved address.
        address: IpAddr,
    },

    /// The address is inside a protected range (or could not be verified).
    Unsafe {
        /// Resolved address.
        address: IpAddr,
        /// First matching range, `None` when classification failed closed.
        matched_range: Option<ProtectedRange>,
        /// What happened to the alert.
        alert: AlertOutcome,
    },
}

impl CheckOutcome {
    /// `false` only when discovery failed.
    ///
    /// A failed dispatch still counts as a successful check: classification
    /// and state tracking completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::DiscoveryFailed)
    }
}

/// Outcome of a check plus whether its state reached storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// What the check found.
    pub outcome: CheckOutcome,
    /// `false` when the state write failed (already logged).
    pub persisted: bool,
}

impl CheckReport {
    /// See [`CheckOutcome::is_success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Read-only view for dashboards and health endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Address resolved for this query; `None` if discovery failed.
    pub current_ip: Option<String>,
    /// Safety verdict; `None` if discovery failed.
    pub is_safe: Option<bool>,
    /// First matching protected range.
    pub matched_range: Option<ProtectedRange>,
    /// Configured protected ranges.
    pub protected_ranges: Vec<ProtectedRange>,
    /// Persisted run state as last loaded.
    pub state: RunState,
    /// Whether an alert would be allowed right now.
    pub alert_permitted: bool,
    /// Seconds until the cooldown lets the next alert through.
    pub cooldown_remaining_secs: Option<u64>,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}
