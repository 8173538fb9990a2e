use crate::conf::error::ConfigError;
use crate::conf::types::{BclogConfig, LegacySettings};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads a config file. `.json` files are read as JSON, anything else as HCL.
pub fn load_config(path: &Path) -> Result<BclogConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        return parse_json(path, &s);
    }

    hcl::from_str(&s).map_err(|e| ConfigError::parse(path, e))
}

fn parse_json(path: &Path, s: &str) -> Result<BclogConfig, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(s).map_err(|e| ConfigError::json(path, e))?;

    let legacy = value.as_object().is_some_and(|object| {
        object
            .keys()
            .any(|key| LegacySettings::TOP_LEVEL_KEYS.contains(&key.as_str()))
    });

    if legacy {
        let settings: LegacySettings =
            serde_json::from_value(value).map_err(|e| ConfigError::json(path, e))?;
        return Ok(settings.into());
    }

    serde_json::from_value(value).map_err(|e| ConfigError::json(path, e))
}

/// `$HOME/.config/bclog/config.hcl`, when `HOME` is set.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("bclog")
            .join("config.hcl")
    })
}

/// Where configuration is read from, at startup and on every reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// Explicitly requested paths must exist; the default path may be absent.
    pub required: bool,
}

impl ConfigLocation {
    /// The explicit path if given, otherwise the default path.
    pub fn resolve(explicit: Option<&Path>) -> Option<Self> {
        match explicit {
            Some(path) => Some(Self {
                path: path.to_path_buf(),
                required: true,
            }),
            None => default_config_path().map(|path| Self {
                path,
                required: false,
            }),
        }
    }

    pub fn load(&self) -> Result<BclogConfig, ConfigError> {
        if !self.required && !self.path.exists() {
            tracing::warn!(
                path = %self.path.display(),
                "config file not found, using defaults"
            );
            return Ok(BclogConfig::default());
        }

        load_config(&self.path)
    }
}

/// Loads from `location`, or returns the defaults when there is none.
pub fn load_or_default(location: Option<&ConfigLocation>) -> Result<BclogConfig, ConfigError> {
    match location {
        Some(location) => location.load(),
        None => {
            tracing::warn!("HOME is not set and no config path given, using defaults");
            Ok(BclogConfig::default())
        }
    }
}
