//! Configuration layer for vpn-watch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **Environment variables** - `WEBHOOK_URL`, `WEBHOOK_METHOD`, `WEBHOOK_USER`,
//!    `WEBHOOK_PASS`, `PROTECTED_RANGES`, `ALERT_COOLDOWN`
//! 3. **TOML config file** - Values from the configuration file
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! Required fields without defaults are `url` and `protected_ranges`.
//!
//! The protected range list from the CLI or environment (comma-separated)
//! **replaces** the TOML list entirely; lists are never merged.
//!
//! # TOML-Only Options
//!
//! The resolver endpoints and timeout are only configurable in the config file.
//!
//! # Credentials
//!
//! Basic auth is used only when both username and password are non-empty.
//! A lone username or password is ignored with a warning.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
