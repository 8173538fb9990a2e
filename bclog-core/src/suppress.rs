//! Live display suppression.
//!
//! Rules decide only whether an event is shown as it arrives. Suppressed
//! events are still stored, counted by `summary` and listed by `show`.

use crate::conf::ConfigError;
use crate::conf::types::SuppressConfig;
use crate::event::{EventKind, LogEvent};
use regex::Regex;
use std::collections::HashSet;

/// A configured process name: matches by equality or, when the entry
/// compiles, as an unanchored regex.
#[derive(Debug, Clone)]
struct NameRule {
    name: String,
    pattern: Option<Regex>,
}

impl NameRule {
    fn compile(entry: &str) -> Self {
        let pattern = match Regex::new(entry) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(
                    entry,
                    error = %err,
                    "process suppression entry is not a valid regex, matching it exactly"
                );
                None
            }
        };

        Self {
            name: entry.to_string(),
            pattern,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.pattern.as_ref().is_some_and(|re| re.is_match(name))
    }
}

/// Compiled form of [`SuppressConfig`].
#[derive(Debug, Clone, Default)]
pub struct SuppressionRules {
    app_levels: HashSet<String>,
    status_codes: HashSet<u16>,
    process_names: Vec<NameRule>,
    php_stack_traces: bool,
    php_content: Vec<Regex>,
}

impl SuppressionRules {
    pub fn compile(config: &SuppressConfig) -> Result<Self, ConfigError> {
        let php_content = config
            .php
            .content_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            app_levels: config.bigcommerce_app.levels.iter().cloned().collect(),
            status_codes: config.nginx_access.status_codes.iter().copied().collect(),
            process_names: config
                .process
                .names
                .iter()
                .map(|entry| NameRule::compile(entry))
                .collect(),
            php_stack_traces: config.php.stack_traces,
            php_content,
        })
    }

    /// Number of configured rules, for reload and `config check` reports.
    pub fn rule_count(&self) -> usize {
        self.app_levels.len()
            + self.status_codes.len()
            + self.process_names.len()
            + self.php_content.len()
            + usize::from(self.php_stack_traces)
    }

    /// Whether `event` should be hidden from live display.
    pub fn suppresses(&self, event: &LogEvent) -> bool {
        match &event.kind {
            EventKind::BigcommerceApp(e) => self.app_levels.contains(&e.level),
            EventKind::NginxAccess(e) => self.status_codes.contains(&e.status_code),
            EventKind::Process(e) => self.process_names.iter().any(|rule| rule.matches(&e.name)),
            EventKind::Php(e) => self.php_content.iter().any(|re| re.is_match(&e.content)),
            EventKind::PhpStackFrame(_) => self.php_stack_traces,
            EventKind::NginxError(_) | EventKind::Generic(_) => false,
        }
    }
}
