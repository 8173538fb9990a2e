use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BclogConfig {
    pub source: SourceConfig,
    pub correlation: CorrelationConfig,
    pub suppress: SuppressConfig,
}

/// Where raw lines come from. `file` wins over `command` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Program and arguments whose stdout is tailed, e.g. `ssh host -- tail -f /var/log/syslog`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Year stamped on syslog timestamps. Defaults to the current local year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Optional bounds on the stack frame correlator's backward scan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorrelationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lookback_events: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lookback_seconds: Option<u64>,
}

impl CorrelationConfig {
    pub fn max_lookback_age(&self) -> Option<Duration> {
        self.max_lookback_seconds.map(Duration::from_secs)
    }
}

/// Live display suppression. Stored history and queries are unaffected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuppressConfig {
    pub bigcommerce_app: AppSuppressConfig,
    pub nginx_access: NginxAccessSuppressConfig,
    pub process: ProcessSuppressConfig,
    pub php: PhpSuppressConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSuppressConfig {
    pub levels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NginxAccessSuppressConfig {
    pub status_codes: Vec<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessSuppressConfig {
    /// Exact process names or regexes matched against the name.
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhpSuppressConfig {
    /// Hide stack frames that could not be attached to an error.
    pub stack_traces: bool,
    pub content_patterns: Vec<String>,
}

/// The settings file layout of the earlier Go tool, accepted for `.json` files.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub(crate) struct LegacySettings {
    /// SSH identity for the Vagrant box; implies the tool's fixed tail command.
    primary_key_file: Option<PathBuf>,
    bigcommerce_app: LegacyApp,
    nginx_access: LegacyNginxAccess,
    process: LegacyProcess,
    php: LegacyPhp,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct LegacyApp {
    suppress_log_levels: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct LegacyNginxAccess {
    suppress_status_codes: Vec<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct LegacyProcess {
    suppress_names: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct LegacyPhp {
    suppress_stack_traces: bool,
    suppress_content_regexes: Vec<String>,
}

impl LegacySettings {
    pub(crate) const TOP_LEVEL_KEYS: [&'static str; 5] = [
        "PrimaryKeyFile",
        "BigcommerceApp",
        "NginxAccess",
        "Process",
        "Php",
    ];

    fn source(&self) -> SourceConfig {
        let Some(key) = &self.primary_key_file else {
            return SourceConfig::default();
        };

        let key = key.to_string_lossy();
        SourceConfig {
            command: [
                "ssh",
                "vagrant@localhost",
                "-p2200",
                "-i",
                key.as_ref(),
                "--",
                "sudo tail -n 10000 -f /var/log/syslog",
            ]
            .map(str::to_string)
            .to_vec(),
            ..Default::default()
        }
    }
}

impl From<LegacySettings> for BclogConfig {
    fn from(legacy: LegacySettings) -> Self {
        BclogConfig {
            source: legacy.source(),
            suppress: SuppressConfig {
                bigcommerce_app: AppSuppressConfig {
                    levels: legacy.bigcommerce_app.suppress_log_levels,
                },
                nginx_access: NginxAccessSuppressConfig {
                    status_codes: legacy.nginx_access.suppress_status_codes,
                },
                process: ProcessSuppressConfig {
                    names: legacy.process.suppress_names,
                },
                php: PhpSuppressConfig {
                    stack_traces: legacy.php.suppress_stack_traces,
                    content_patterns: legacy.php.suppress_content_regexes,
                },
            },
            ..Default::default()
        }
    }
}
