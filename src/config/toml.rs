//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook configuration section
    #[serde(default)]
    pub webhook: WebhookSection,

    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Public address discovery configuration
    #[serde(default)]
    pub resolver: ResolverSection,
}

/// Webhook configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Webhook URL
    pub url: Option<String>,

    /// HTTP method (default: POST)
    pub method: Option<String>,

    /// Basic auth username
    pub username: Option<String>,

    /// Basic auth password
    pub password: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,

    /// Handlebars template for the alert message
    pub message_template: Option<String>,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// CIDR ranges that indicate the VPN is down
    #[serde(default)]
    pub protected_ranges: Vec<String>,

    /// Alert cooldown, e.g. "1h30m"
    pub cooldown: Option<String>,

    /// Interval between checks in watch mode, in seconds
    pub check_interval: Option<u64>,

    /// Path to state file
    pub state_file: Option<String>,
}

/// Public address discovery configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// Echo endpoints, tried in order
    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Per-endpoint timeout in seconds
    pub timeout: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# vpn-watch Configuration File

[webhook]
# Webhook URL (required, env: WEBHOOK_URL)
# url = "https://hooks.example.com/api/webhook/vpn"

# HTTP method: GET, POST, PUT, PATCH or HEAD (default: POST, env: WEBHOOK_METHOD)
# GET sends the alert as query parameters, HEAD sends no data.
# method = "POST"

# Basic auth, used only when both are set (env: WEBHOOK_USER, WEBHOOK_PASS)
# username = "monitor"
# password = "secret"

# Request timeout in seconds, 10-30 (default: 10)
# timeout = 10

# Handlebars template for the alert message
# Available variables: {{current_ip}}, {{matched_range}}, {{protected_ranges}},
# {{consecutive_alerts}}
# message_template = "VPN down: {{current_ip}} is in {{matched_range}}"

[monitor]
# CIDR ranges of your ISP / home network (required, env: PROTECTED_RANGES)
# Note: --protected-ranges REPLACES this list entirely (not merged)
# protected_ranges = ["203.0.113.0/24", "2001:db8::/32"]

# Minimum time between alerts (default: 1h, env: ALERT_COOLDOWN)
# cooldown = "1h"

# Interval between checks in watch mode, in seconds (default: 43200)
# check_interval = 43200

# State file (default: <data dir>/vpn-watch/state.json)
# state_file = "~/.local/share/vpn-watch/state.json"

[resolver]
# Echo services returning the caller's IP as plain text, tried in order
# endpoints = [
#     "https://ipinfo.io/ip",
#     "https://api.ipify.org",
#     "https://ip.seeip.org",
#     "https://ifconfig.me/ip",
# ]

# Per-endpoint timeout in seconds (default: 10)
# timeout = 10
"#
    .to_string()
}
