//! Tests for validated configuration.

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["vpn-watch"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to create CLI args with both required fields plus `extra`
fn cli_with(extra: &[&str]) -> Cli {
    let mut args = vec![
        "--url",
        "https://example.com",
        "--protected-ranges",
        "203.0.113.0/24",
    ];
    args.extend(extra);
    cli(&args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod loading_tests;
mod precedence_tests;
