use crate::conf::types::{
    AppSuppressConfig, BclogConfig, CorrelationConfig, NginxAccessSuppressConfig,
    PhpSuppressConfig, ProcessSuppressConfig, SourceConfig, SuppressConfig,
};
use crate::conf::{ConfigError, ConfigLocation, load_config};

use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

const FULL_HCL: &str = r#"
source {
  command = ["ssh", "vagrant@localhost", "-p2200", "--", "sudo tail -f /var/log/syslog"]
  year    = 2024
}

correlation {
  max_lookback_events  = 500
  max_lookback_seconds = 120
}

suppress {
  bigcommerce_app { levels = ["DEBUG"] }
  nginx_access    { status_codes = [200, 304] }
  process         { names = ["cron", "^systemd"] }
  php {
    stack_traces     = true
    content_patterns = ["^Deprecated"]
  }
}
"#;

#[test]
fn loads_full_hcl_config() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.hcl");
    fs::write(&path, FULL_HCL).unwrap();

    // Act
    let config = load_config(&path).unwrap();

    // Assert
    assert_eq!(
        config,
        BclogConfig {
            source: SourceConfig {
                command: vec![
                    "ssh".to_string(),
                    "vagrant@localhost".to_string(),
                    "-p2200".to_string(),
                    "--".to_string(),
                    "sudo tail -f /var/log/syslog".to_string(),
                ],
                file: None,
                year: Some(2024),
            },
            correlation: CorrelationConfig {
                max_lookback_events: Some(500),
                max_lookback_seconds: Some(120),
            },
            suppress: SuppressConfig {
                bigcommerce_app: AppSuppressConfig {
                    levels: vec!["DEBUG".to_string()],
                },
                nginx_access: NginxAccessSuppressConfig {
                    status_codes: vec![200, 304],
                },
                process: ProcessSuppressConfig {
                    names: vec!["cron".to_string(), "^systemd".to_string()],
                },
                php: PhpSuppressConfig {
                    stack_traces: true,
                    content_patterns: vec!["^Deprecated".to_string()],
                },
            },
        }
    );
    assert_eq!(
        config.correlation.max_lookback_age(),
        Some(Duration::from_secs(120))
    );
}

#[test]
fn all_blocks_are_optional() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.hcl");
    fs::write(&path, "").unwrap();

    // Act
    let config = load_config(&path).unwrap();

    // Assert
    assert_eq!(config, BclogConfig::default());
}

#[test]
fn unknown_fields_are_rejected() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.hcl");
    fs::write(&path, "suppress {\n  nginx { status_codes = [200] }\n}\n").unwrap();

    // Act
    let err = load_config(&path).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn json_config_uses_the_same_layout() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"suppress": {"nginx_access": {"status_codes": [200]}}}"#,
    )
    .unwrap();

    // Act
    let config = load_config(&path).unwrap();

    // Assert
    assert_eq!(config.suppress.nginx_access.status_codes, vec![200]);
}

#[test]
fn legacy_json_settings_are_accepted() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{
            "BigcommerceApp": {"SuppressLogLevels": ["DEBUG", "INFO"]},
            "NginxAccess": {"SuppressStatusCodes": [200]},
            "Process": {"SuppressNames": ["cron"]},
            "Php": {"SuppressStackTraces": true, "SuppressContentRegexes": ["^Notice"]}
        }"#,
    )
    .unwrap();

    // Act
    let config = load_config(&path).unwrap();

    // Assert
    assert_eq!(
        config.suppress.bigcommerce_app.levels,
        vec!["DEBUG".to_string(), "INFO".to_string()]
    );
    assert_eq!(config.suppress.nginx_access.status_codes, vec![200]);
    assert_eq!(config.suppress.process.names, vec!["cron".to_string()]);
    assert!(config.suppress.php.stack_traces);
    assert_eq!(
        config.suppress.php.content_patterns,
        vec!["^Notice".to_string()]
    );
    assert_eq!(config.source, SourceConfig::default());
}

#[test]
fn legacy_primary_key_file_becomes_the_ssh_tail_command() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "PrimaryKeyFile": "/home/u/.ssh/id_rsa",
            "BigcommerceApp": {"SuppressLogLevels": ["DEBUG"]}
        }"#,
    )
    .unwrap();

    // Act
    let config = load_config(&path).unwrap();

    // Assert
    assert_eq!(
        config.source.command,
        vec![
            "ssh",
            "vagrant@localhost",
            "-p2200",
            "-i",
            "/home/u/.ssh/id_rsa",
            "--",
            "sudo tail -n 10000 -f /var/log/syslog",
        ]
    );
    assert_eq!(config.suppress.bigcommerce_app.levels, vec!["DEBUG".to_string()]);
}

#[test]
fn malformed_json_is_a_json_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{not json").unwrap();

    assert!(matches!(
        load_config(&path).unwrap_err(),
        ConfigError::Json { .. }
    ));
}

#[test]
fn missing_explicit_path_is_an_error() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.hcl");
    let location = ConfigLocation::resolve(Some(&path)).unwrap();

    // Act
    let err = location.load().unwrap_err();

    // Assert
    assert!(location.required);
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn missing_default_path_falls_back_to_defaults() {
    // Arrange
    let dir = tempdir().unwrap();
    let location = ConfigLocation {
        path: dir.path().join("config.hcl"),
        required: false,
    };

    // Act
    let config = location.load().unwrap();

    // Assert
    assert_eq!(config, BclogConfig::default());
}

#[test]
fn resolve_without_explicit_path_uses_home() {
    let Some(location) = ConfigLocation::resolve(None) else {
        // HOME unset in this environment.
        return;
    };

    assert!(!location.required);
    assert!(location.path.ends_with(PathBuf::from(".config/bclog/config.hcl")));
}
