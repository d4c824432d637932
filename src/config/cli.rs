//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.
//! Options that the container deployment configured through the environment
//! are also bound to their environment variables.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// vpn-watch: VPN-down monitor
///
/// Checks the public IP address against protected CIDR ranges and
/// raises a webhook alert when traffic is leaving outside the tunnel.
#[derive(Debug, Parser)]
#[command(name = "vpn-watch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: check)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Webhook URL (required)
    #[arg(long, global = true, env = "WEBHOOK_URL")]
    pub url: Option<String>,

    /// HTTP method for webhook requests (GET, POST, PUT, PATCH, HEAD)
    #[arg(long, global = true, env = "WEBHOOK_METHOD")]
    pub method: Option<String>,

    /// Basic auth username
    #[arg(long, global = true, env = "WEBHOOK_USER")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, global = true, env = "WEBHOOK_PASS", hide_env_values = true)]
    pub password: Option<String>,

    /// Webhook request timeout in seconds (10-30)
    #[arg(long = "webhook-timeout", global = true)]
    pub webhook_timeout: Option<u64>,

    /// Handlebars template for the alert message
    #[arg(long = "message-template", global = true)]
    pub message_template: Option<String>,

    /// Comma-separated CIDR ranges that indicate the VPN is down
    #[arg(
        long = "protected-ranges",
        value_name = "CIDR,...",
        global = true,
        env = "PROTECTED_RANGES"
    )]
    pub protected_ranges: Option<String>,

    /// Minimum time between alerts, e.g. "1h", "30m", "1h30m" or seconds
    #[arg(long, global = true, env = "ALERT_COOLDOWN")]
    pub cooldown: Option<String>,

    /// Interval between checks in watch mode, in seconds
    #[arg(long = "check-interval", global = true)]
    pub check_interval: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Path to state file
    #[arg(long = "state-file", global = true)]
    pub state_file: Option<PathBuf>,

    /// Test mode - log alerts without sending webhooks
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for vpn-watch
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "vpn-watch.toml")]
        output: PathBuf,
    },

    /// Run a single check and exit
    Check,

    /// Print the current status as JSON without changing state
    Status,

    /// Run a check now and then on every check interval
    Watch,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// The command to run; `check` when none was given.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Check)
    }
}
