//! Validated configuration after merging CLI, environment and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use handlebars::Handlebars;
use url::Url;

use crate::classify::ProtectedRange;
use crate::gate::parse_cooldown;
use crate::resolver::DEFAULT_ENDPOINTS;
use crate::transport::BasicAuth;
use crate::webhook::{MAX_TIMEOUT, MIN_TIMEOUT, WebhookMethod, redact_url};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
/// It is an immutable snapshot: a running process never re-reads it.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// Environment variables reach this type through the CLI (clap `env` bindings).
#[derive(Debug)]
pub struct ValidatedConfig {
    /// CIDR ranges that indicate the VPN is down (at least one)
    pub protected_ranges: Vec<ProtectedRange>,

    /// Webhook URL
    pub url: Url,

    /// HTTP method for webhook requests
    pub method: WebhookMethod,

    /// Basic auth credentials, present only when both parts are non-empty
    pub auth: Option<BasicAuth>,

    /// Webhook request timeout
    pub webhook_timeout: Duration,

    /// Handlebars template for the alert message (optional)
    pub message_template: Option<String>,

    /// Minimum time between alerts
    pub cooldown: Duration,

    /// Interval between checks in watch mode
    pub check_interval: Duration,

    /// Echo endpoints, tried in order
    pub resolver_endpoints: Vec<Url>,

    /// Per-endpoint resolver timeout
    pub resolver_timeout: Duration,

    /// Path to state file
    pub state_file: PathBuf,

    /// Dry-run mode (log alerts without sending webhooks)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges = self
            .protected_ranges
            .iter()
            .map(ProtectedRange::as_str)
            .collect::<Vec<_>>()
            .join(",");

        write!(
            f,
            "Config {{ url: {}, method: {}, auth: {}, ranges: [{}], cooldown: {}s, \
             check_interval: {}s, endpoints: {}, state_file: {}, dry_run: {} }}",
            redact_url(&self.url),
            self.method,
            if self.auth.is_some() {
                "enabled"
            } else {
                "disabled"
            },
            ranges,
            self.cooldown.as_secs(),
            self.check_interval.as_secs(),
            self.resolver_endpoints.len(),
            self.state_file.display(),
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and the environment variables bound to them) take
    /// precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`url`, `protected_ranges`)
    /// - A protected range is not valid CIDR
    /// - A URL is invalid or not http/https
    /// - The method is not one of GET, POST, PUT, PATCH, HEAD
    /// - A duration is zero or out of bounds
    /// - The message template does not compile
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let protected_ranges = Self::resolve_ranges(cli, toml)?;
        let url = Self::resolve_url(cli, toml)?;
        let method = Self::resolve_method(cli, toml)?;
        let auth = Self::resolve_auth(cli, toml);
        let webhook_timeout = Self::resolve_webhook_timeout(cli, toml)?;
        let message_template = Self::resolve_message_template(cli, toml)?;

        let cooldown = parse_cooldown(
            cli.cooldown
                .as_deref()
                .or_else(|| toml.and_then(|t| t.monitor.cooldown.as_deref()))
                .unwrap_or(defaults::COOLDOWN),
        );

        let check_interval = Self::resolve_check_interval(cli, toml)?;
        let resolver_endpoints = Self::resolve_endpoints(toml)?;
        let resolver_timeout = Self::resolve_resolver_timeout(toml)?;
        let state_file = Self::resolve_state_file(cli, toml);

        Ok(Self {
            protected_ranges,
            url,
            method,
            auth,
            webhook_timeout,
            message_template,
            cooldown,
            check_interval,
            resolver_endpoints,
            resolver_timeout,
            state_file,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_ranges(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<ProtectedRange>, ConfigError> {
        // CLI list replaces the TOML list entirely
        let ranges = if let Some(ref list) = cli.protected_ranges {
            ProtectedRange::parse_list(list)?
        } else if let Some(toml) = toml {
            toml.monitor
                .protected_ranges
                .iter()
                .map(|r| ProtectedRange::parse(r))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        if ranges.is_empty() {
            return Err(ConfigError::missing(
                field::PROTECTED_RANGES,
                "Use --protected-ranges, PROTECTED_RANGES or set monitor.protected_ranges in config file",
            ));
        }

        Ok(ranges)
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::URL,
                    "Use --url, WEBHOOK_URL or set webhook.url in config file",
                )
            })?;

        parse_http_url(url_str)
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<WebhookMethod, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .parse::<WebhookMethod>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_auth(cli: &Cli, toml: Option<&TomlConfig>) -> Option<BasicAuth> {
        let username = cli
            .username
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.username.as_deref()));
        let password = cli
            .password
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.password.as_deref()));

        let auth = BasicAuth::from_parts(username, password);
        let partial = |part: Option<&str>| part.is_some_and(|p| !p.is_empty());

        if auth.is_none() && (partial(username) || partial(password)) {
            tracing::warn!(
                "Basic auth needs both a username and a password; sending webhooks without auth"
            );
        }

        auth
    }

    fn resolve_webhook_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        let timeout = Duration::from_secs(
            cli.webhook_timeout
                .or_else(|| toml.and_then(|t| t.webhook.timeout))
                .unwrap_or(defaults::WEBHOOK_TIMEOUT_SECS),
        );

        if !(MIN_TIMEOUT..=MAX_TIMEOUT).contains(&timeout) {
            return Err(ConfigError::InvalidDuration {
                field: "webhook.timeout",
                reason: format!(
                    "must be between {} and {} seconds",
                    MIN_TIMEOUT.as_secs(),
                    MAX_TIMEOUT.as_secs()
                ),
            });
        }

        Ok(timeout)
    }

    fn resolve_message_template(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<String>, ConfigError> {
        let template = cli
            .message_template
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.message_template.clone()));

        // Validate Handlebars syntax if template is provided
        if let Some(ref tmpl) = template {
            Self::validate_template(tmpl)?;
        }

        Ok(template)
    }

    fn validate_template(template: &str) -> Result<(), ConfigError> {
        let hbs = Handlebars::new();
        // Compile-check only; render with empty context to validate syntax
        hbs.render_template(template, &serde_json::json!({}))
            .map_err(|e| ConfigError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn resolve_check_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .check_interval
            .or_else(|| toml.and_then(|t| t.monitor.check_interval))
            .unwrap_or(defaults::CHECK_INTERVAL_SECS);

        non_zero_secs("check_interval", seconds)
    }

    fn resolve_endpoints(toml: Option<&TomlConfig>) -> Result<Vec<Url>, ConfigError> {
        let configured = toml.map(|t| &t.resolver.endpoints);

        match configured {
            Some(endpoints) if !endpoints.is_empty() => {
                endpoints.iter().map(|e| parse_http_url(e)).collect()
            }
            _ => DEFAULT_ENDPOINTS.iter().map(|e| parse_http_url(e)).collect(),
        }
    }

    fn resolve_resolver_timeout(toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = toml
            .and_then(|t| t.resolver.timeout)
            .unwrap_or(defaults::RESOLVER_TIMEOUT_SECS);

        non_zero_secs("resolver.timeout", seconds)
    }

    fn resolve_state_file(cli: &Cli, toml: Option<&TomlConfig>) -> PathBuf {
        // CLI takes precedence
        if let Some(ref path) = cli.state_file {
            return expand_home(path);
        }

        // Fall back to TOML, then the platform data directory
        toml.and_then(|t| t.monitor.state_file.as_deref())
            .map_or_else(defaults::state_file, |p| expand_home(Path::new(p)))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_http_url(s: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
        url: s.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: s.to_string(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

fn non_zero_secs(field: &'static str, seconds: u64) -> Result<Duration, ConfigError> {
    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

/// Replaces a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
