//! Durable run-state tracking across checks.
//!
//! This module provides the [`RunState`] record, the [`StateStore`]
//! abstraction, and the JSON file implementation ([`FileStateStore`]).

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileStateStore;

use std::io;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Counters and timestamps carried from one check to the next.
///
/// Mutated only by the check orchestrator; a single writer is assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// When the last alert was successfully delivered.
    ///
    /// An unreadable value loads as `None` so the cooldown fails open.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_alert_time: Option<DateTime<Utc>>,

    /// Back-to-back unsafe classifications since the last safe one.
    #[serde(default)]
    pub consecutive_alerts: u64,

    /// Last successfully resolved public address.
    #[serde(default)]
    pub last_known_address: Option<String>,

    /// Checks started, including ones whose discovery failed.
    #[serde(default)]
    pub total_checks: u64,

    /// Alerts delivered.
    #[serde(default)]
    pub alerts_sent: u64,
}

/// Accepts RFC 3339 timestamps (with or without offset); anything else is `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = raw else {
        return Ok(None);
    };

    let parsed = value.as_str().and_then(|text| {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
            })
            .ok()
    });

    if parsed.is_none() {
        tracing::warn!("Ignoring unreadable last_alert_time {value}");
    }
    Ok(parsed)
}

/// Result of loading state from persistent storage.
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Successfully loaded a previously saved state.
    Loaded(RunState),

    /// No state file exists (first run or explicitly deleted).
    NotFound,

    /// State file exists but could not be parsed.
    /// The check continues from defaults and overwrites it on save.
    Corrupted {
        /// Reason for corruption (for logging).
        reason: String,
    },
}

impl LoadResult {
    /// Returns the loaded state, or defaults for `NotFound`/`Corrupted`.
    #[must_use]
    pub fn into_state(self) -> RunState {
        match self {
            Self::Loaded(state) => state,
            Self::NotFound | Self::Corrupted { .. } => RunState::default(),
        }
    }

    /// Returns `true` if state was successfully loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Errors that can occur while persisting state.
///
/// Only covers write-side errors; read-side issues are modeled
/// as [`LoadResult`] variants.
#[derive(Debug, Error)]
pub enum StateError {
    /// Failed to write the state file.
    #[error("Failed to write state file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize state to JSON.
    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The blocking write task did not complete.
    #[error("State write task failed: {0}")]
    Task(String),
}

/// Abstraction for persisting [`RunState`] between checks.
///
/// Implementations should:
/// - Write atomically so concurrent readers never see a truncated file
/// - Return `LoadResult::NotFound` for a missing file
/// - Return `LoadResult::Corrupted` for unreadable content
pub trait StateStore: Send + Sync {
    /// Loads previously saved state.
    fn load(&self) -> LoadResult;

    /// Saves the full state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    fn save(
        &self,
        state: &RunState,
    ) -> impl std::future::Future<Output = Result<(), StateError>> + Send;
}
