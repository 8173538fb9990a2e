use crate::conf::ConfigLocation;
use crate::runtime::{ReloadError, RuntimeState, reload_runtime_state};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared access to the live [`RuntimeState`] and the means to reload it.
#[derive(Debug)]
pub struct RuntimeHandle {
    location: Option<ConfigLocation>,
    state: ArcSwap<RuntimeState>,
    epoch: AtomicU64,
}

impl RuntimeHandle {
    pub fn new(location: Option<ConfigLocation>, initial: RuntimeState) -> Self {
        Self {
            location,
            state: ArcSwap::from_pointee(initial),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn location(&self) -> Option<&ConfigLocation> {
        self.location.as_ref()
    }

    /// Snapshot of the current state.
    pub fn load(&self) -> Arc<RuntimeState> {
        self.state.load_full()
    }

    /// Number of successful reloads so far.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Relaxed)
    }

    /// Reloads from the configured location, returning the new epoch.
    pub fn reload(&self) -> Result<u64, ReloadError> {
        if let Err(err) = reload_runtime_state(self.location.as_ref(), &self.state) {
            tracing::warn!(error = %err, "reload failed, keeping current rules");
            return Err(err);
        }

        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(epoch, "reload applied");
        Ok(epoch)
    }
}
