//! Tests for configuration loading and required fields.

use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, tempdir};

use super::*;

mod required_fields {
    use super::*;

    #[test]
    fn missing_url_returns_error() {
        let cli = cli(&["--protected-ranges", "203.0.113.0/24"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired { field: "url", .. })
        ));
    }

    #[test]
    fn missing_ranges_returns_error() {
        let cli = cli(&["--url", "https://example.com"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired {
                field: "protected_ranges",
                ..
            })
        ));
    }

    #[test]
    fn both_required_fields_from_cli() {
        let config = ValidatedConfig::from_raw(&cli_with(&[]), None).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/");
        assert_eq!(config.protected_ranges.len(), 1);
        assert_eq!(config.protected_ranges[0].as_str(), "203.0.113.0/24");
    }

    #[test]
    fn required_fields_from_toml() {
        let cli = cli(&[]);
        let toml = toml(
            r#"
            [webhook]
            url = "https://example.com/webhook"

            [monitor]
            protected_ranges = ["203.0.113.0/24", "2001:db8::/32"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/webhook");
        assert_eq!(config.protected_ranges.len(), 2);
    }
}

mod config_load {
    use super::*;

    #[test]
    fn load_from_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [webhook]
            url = "https://example.com/webhook"

            [monitor]
            protected_ranges = ["203.0.113.0/24"]
        "#
        )
        .unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/webhook");
    }

    #[test]
    fn load_without_config_file() {
        let config = ValidatedConfig::load(&cli_with(&[])).unwrap();

        assert_eq!(config.url.as_str(), "https://example.com/");
    }

    #[test]
    fn load_nonexistent_config_file_returns_error() {
        let cli = cli(&["--config", "nonexistent_file_12345.toml"]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }
}

mod write_config {
    use super::super::super::validated::write_default_config;
    use super::*;

    #[test]
    fn write_default_config_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test-config.toml");

        write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[webhook]"));
        assert!(content.contains("[monitor]"));
        assert!(content.contains("[resolver]"));
    }

    #[test]
    fn write_default_config_to_invalid_path_returns_error() {
        let path = Path::new("/nonexistent_dir_12345/config.toml");
        let result = write_default_config(path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod state_file {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn cli_path_is_used_verbatim() {
        let config =
            ValidatedConfig::from_raw(&cli_with(&["--state-file", "/tmp/vpn.json"]), None)
                .unwrap();

        assert_eq!(config.state_file, PathBuf::from("/tmp/vpn.json"));
    }

    #[test]
    fn cli_path_overrides_toml() {
        let toml = toml(
            r#"
            [monitor]
            state_file = "/var/lib/toml.json"
        "#,
        );
        let config = ValidatedConfig::from_raw(
            &cli_with(&["--state-file", "/tmp/cli.json"]),
            Some(&toml),
        )
        .unwrap();

        assert_eq!(config.state_file, PathBuf::from("/tmp/cli.json"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let toml = toml(
            r#"
            [monitor]
            state_file = "~/vpn-watch/state.json"
        "#,
        );
        let config = ValidatedConfig::from_raw(&cli_with(&[]), Some(&toml)).unwrap();

        assert_eq!(config.state_file, home.join("vpn-watch").join("state.json"));
    }

    #[test]
    fn default_lives_in_data_directory() {
        let config = ValidatedConfig::from_raw(&cli_with(&[]), None).unwrap();

        assert_eq!(config.state_file, crate::config::defaults::state_file());
        assert!(config.state_file.ends_with("state.json"));
    }
}
