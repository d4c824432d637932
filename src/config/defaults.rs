//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Default HTTP method for webhook requests.
pub const METHOD: &str = "POST";

/// Default webhook request timeout in seconds.
pub const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Default per-endpoint resolver timeout in seconds.
pub const RESOLVER_TIMEOUT_SECS: u64 = 10;

/// Default alert cooldown, in the `1h30m` notation.
pub const COOLDOWN: &str = "1h";

/// Default interval between checks in watch mode (twelve hours).
pub const CHECK_INTERVAL_SECS: u64 = 43_200;

/// Application directory under the platform data directory.
pub const APP_DIR: &str = "vpn-watch";

/// State file name.
pub const STATE_FILE_NAME: &str = "state.json";

/// State file used when no data directory is known.
pub const FALLBACK_STATE_FILE: &str = "vpn-watch-state.json";

/// Default check interval as Duration.
#[must_use]
pub const fn check_interval() -> Duration {
    Duration::from_secs(CHECK_INTERVAL_SECS)
}

/// Default webhook timeout as Duration.
#[must_use]
pub const fn webhook_timeout() -> Duration {
    Duration::from_secs(WEBHOOK_TIMEOUT_SECS)
}

/// Default resolver timeout as Duration.
#[must_use]
pub const fn resolver_timeout() -> Duration {
    Duration::from_secs(RESOLVER_TIMEOUT_SECS)
}

/// Default state file location: `<data_local_dir>/vpn-watch/state.json`.
#[must_use]
pub fn state_file() -> PathBuf {
    dirs::data_local_dir().map_or_else(
        || PathBuf::from(FALLBACK_STATE_FILE),
        |dir| dir.join(APP_DIR).join(STATE_FILE_NAME),
    )
}
