use crate::correlate::Lookback;
use crate::suppress::SuppressionRules;

/// The reloadable part of the configuration, compiled.
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    pub suppression: SuppressionRules,
    pub lookback: Lookback,
}
