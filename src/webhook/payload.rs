//! The alert payload sent to the webhook.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::classify::ProtectedRange;
use crate::state::RunState;

/// Tag carried in every alert's `alert_type` field.
pub const ALERT_TYPE: &str = "vpn_down";

/// Counter snapshot embedded in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    /// Checks started so far.
    pub total_checks: u64,
    /// Alerts delivered before this one.
    pub alerts_sent: u64,
}

/// One alert, built per dispatch and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    /// Human-readable alert text.
    pub message: String,
    /// The resolved public address.
    pub current_ip: String,
    /// Every configured protected range.
    pub protected_ranges: Vec<ProtectedRange>,
    /// The range that matched, if classification found one.
    pub matched_range: Option<ProtectedRange>,
    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,
    /// Always [`ALERT_TYPE`].
    pub alert_type: &'static str,
    /// Unsafe checks in a row, including this one.
    pub consecutive_alerts: u64,
    /// Counters at the time of sending.
    pub monitor_stats: MonitorStats,
}

/// Default alert text.
#[must_use]
pub fn default_message(current_ip: &str, matched_range: Option<&ProtectedRange>) -> String {
    match matched_range {
        Some(range) => {
            format!("VPN Alert: Current IP {current_ip} is inside protected range {range}")
        }
        None => format!(
            "VPN Alert: Current IP {current_ip} could not be verified against the protected ranges"
        ),
    }
}

impl NotificationPayload {
    /// Builds a payload with the default message from the current run state.
    #[must_use]
    pub fn new(
        current_ip: impl Into<String>,
        protected_ranges: &[ProtectedRange],
        matched_range: Option<ProtectedRange>,
        state: &RunState,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let current_ip = current_ip.into();
        Self {
            message: default_message(&current_ip, matched_range.as_ref()),
            current_ip,
            protected_ranges: protected_ranges.to_vec(),
            matched_range,
            timestamp,
            alert_type: ALERT_TYPE,
            consecutive_alerts: state.consecutive_alerts,
            monitor_stats: MonitorStats {
                total_checks: state.total_checks,
                alerts_sent: state.alerts_sent,
            },
        }
    }

    /// Replaces the message text.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Flattened form used as URL query parameters.
    ///
    /// Lists are comma-joined, a missing matched range is an empty string and
    /// the stats are lifted to the top level.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let ranges = self
            .protected_ranges
            .iter()
            .map(ProtectedRange::as_str)
            .collect::<Vec<_>>()
            .join(",");

        vec![
            ("message", self.message.clone()),
            ("current_ip", self.current_ip.clone()),
            ("protected_ranges", ranges),
            (
                "matched_range",
                self.matched_range
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            (
                "timestamp",
                self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("alert_type", self.alert_type.to_string()),
            ("consecutive_alerts", self.consecutive_alerts.to_string()),
            ("total_checks", self.monitor_stats.total_checks.to_string()),
            ("alerts_sent", self.monitor_stats.alerts_sent.to_string()),
        ]
    }
}
