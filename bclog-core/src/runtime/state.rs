use crate::conf::{BclogConfig, ConfigError, ConfigLocation, load_or_default};
use crate::correlate::Lookback;
use crate::runtime::{ReloadError, RuntimeState};
use crate::suppress::SuppressionRules;
use arc_swap::ArcSwap;
use std::sync::Arc;

pub fn build_runtime_state(cfg: &BclogConfig) -> Result<RuntimeState, ConfigError> {
    let suppression = SuppressionRules::compile(&cfg.suppress)?;
    tracing::debug!(rules = suppression.rule_count(), "compiled suppression rules");

    let lookback = Lookback {
        max_events: cfg.correlation.max_lookback_events,
        max_age: cfg.correlation.max_lookback_age(),
    };

    Ok(RuntimeState {
        suppression,
        lookback,
    })
}

/// Re-reads configuration and swaps in the new state.
///
/// On any error the current state is left untouched.
pub fn reload_runtime_state(
    location: Option<&ConfigLocation>,
    state: &ArcSwap<RuntimeState>,
) -> Result<(), ReloadError> {
    let cfg = load_or_default(location)?;

    // Build the new state before touching the live one.
    let new_state = build_runtime_state(&cfg)?;

    let old = state.load();
    tracing::info!(
        old_rules = old.suppression.rule_count(),
        new_rules = new_state.suppression.rule_count(),
        max_lookback_events = ?new_state.lookback.max_events,
        max_lookback_age = ?new_state.lookback.max_age,
        "runtime state reloaded"
    );

    state.store(Arc::new(new_state));

    Ok(())
}
