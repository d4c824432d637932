//! Tests for CLI vs TOML precedence rules.

use std::time::Duration;

use crate::webhook::WebhookMethod;

use super::*;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_url_overrides_toml() {
        let cli = cli(&[
            "--url",
            "https://cli.example.com",
            "--protected-ranges",
            "203.0.113.0/24",
        ]);
        let toml = toml(
            r#"
            [webhook]
            url = "https://toml.example.com"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.url.as_str(), "https://cli.example.com/");
    }

    #[test]
    fn cli_ranges_replace_toml_list() {
        let cli = cli(&[
            "--url",
            "https://example.com",
            "--protected-ranges",
            "198.51.100.0/24",
        ]);
        let toml = toml(
            r#"
            [monitor]
            protected_ranges = ["203.0.113.0/24", "192.0.2.0/24"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.protected_ranges.len(), 1);
        assert_eq!(config.protected_ranges[0].as_str(), "198.51.100.0/24");
    }

    #[test]
    fn cli_method_overrides_toml() {
        let toml = toml(
            r#"
            [webhook]
            method = "PUT"
        "#,
        );

        let config =
            ValidatedConfig::from_raw(&cli_with(&["--method", "GET"]), Some(&toml)).unwrap();

        assert_eq!(config.method, WebhookMethod::Get);
    }

    #[test]
    fn cli_cooldown_overrides_toml() {
        let toml = toml(
            r#"
            [monitor]
            cooldown = "2h"
        "#,
        );

        let config =
            ValidatedConfig::from_raw(&cli_with(&["--cooldown", "30m"]), Some(&toml)).unwrap();

        assert_eq!(config.cooldown, Duration::from_secs(1800));
    }

    #[test]
    fn cli_credentials_override_toml() {
        let toml = toml(
            r#"
            [webhook]
            username = "toml-user"
            password = "toml-pass"
        "#,
        );

        let config = ValidatedConfig::from_raw(
            &cli_with(&["--username", "cli-user", "--password", "cli-pass"]),
            Some(&toml),
        )
        .unwrap();

        let auth = config.auth.unwrap();
        assert_eq!(auth.username, "cli-user");
        assert_eq!(auth.password, "cli-pass");
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn toml_values_used_when_cli_silent() {
        let toml = toml(
            r#"
            [webhook]
            method = "patch"
            timeout = 25

            [monitor]
            cooldown = "1h30m"
            check_interval = 900
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli_with(&[]), Some(&toml)).unwrap();

        assert_eq!(config.method, WebhookMethod::Patch);
        assert_eq!(config.webhook_timeout, Duration::from_secs(25));
        assert_eq!(config.cooldown, Duration::from_secs(5400));
        assert_eq!(config.check_interval, Duration::from_secs(900));
    }

    #[test]
    fn credentials_can_mix_sources() {
        let toml = toml(
            r#"
            [webhook]
            password = "toml-pass"
        "#,
        );

        let config =
            ValidatedConfig::from_raw(&cli_with(&["--username", "cli-user"]), Some(&toml))
                .unwrap();

        let auth = config.auth.unwrap();
        assert_eq!(auth.username, "cli-user");
        assert_eq!(auth.password, "toml-pass");
    }
}
