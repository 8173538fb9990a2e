use crate::conf::{BclogConfig, ConfigLocation, load_or_default};
use crate::runtime::build_runtime_state;
use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to the config file (default: ~/.config/bclog/config.hcl)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print resolved configuration
    Dump {
        /// Path to the config file (default: ~/.config/bclog/config.hcl)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

pub fn run(cmd: ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Check { config } => check(config.as_deref()),
        ConfigCmd::Dump { config, json, yaml } => dump(config.as_deref(), json, yaml),
    }
}

fn load(path: Option<&Path>) -> Result<(Option<ConfigLocation>, BclogConfig)> {
    let location = ConfigLocation::resolve(path);
    let cfg = load_or_default(location.as_ref()).context("failed to load configuration")?;
    Ok((location, cfg))
}

pub fn check(path: Option<&Path>) -> Result<()> {
    let (location, cfg) = load(path)?;
    let state = build_runtime_state(&cfg).context("failed to compile configuration")?;

    match &location {
        Some(location) if location.path.exists() => {
            println!("✔ Config loaded from {}", location.path.display())
        }
        Some(location) => println!(
            "✔ No config at {}, using default configuration",
            location.path.display()
        ),
        None => println!("✔ Using default configuration"),
    }

    if let Some(file) = &cfg.source.file {
        println!("✔ source: file {}", file.display());
    } else if !cfg.source.command.is_empty() {
        println!("✔ source: command {}", cfg.source.command.join(" "));
    } else {
        println!("✔ source: none configured (pass --file or -- COMMAND to run)");
    }

    println!("✔ {} suppression rules", state.suppression.rule_count());
    println!(
        "✔ correlation lookback: {} events, {} seconds",
        describe_bound(cfg.correlation.max_lookback_events),
        describe_bound(cfg.correlation.max_lookback_seconds),
    );

    Ok(())
}

fn describe_bound<T: ToString>(bound: Option<T>) -> String {
    bound.map_or_else(|| "unbounded".to_string(), |b| b.to_string())
}

/// JSON unless `--yaml` is given; `--json` only makes the default explicit.
pub fn dump(path: Option<&Path>, _json: bool, yaml: bool) -> Result<()> {
    let (_, cfg) = load(path)?;

    if yaml { dump_yaml(&cfg) } else { dump_json(&cfg) }
}

fn dump_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

fn dump_yaml<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_yaml::to_string(value)?;
    println!("{s}");
    Ok(())
}
