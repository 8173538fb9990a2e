//! Append-only event history with a per-category index.
//!
//! All access goes through one mutex: each append (correlation included) and
//! each query snapshot is a single critical section. Queries clone what they
//! need so rendering never happens under the lock.

mod query;
#[cfg(test)]
mod tests;

pub use query::{CategoryFilter, CategorySummary, IndexedEvent, QueryError};

use crate::correlate::{Lookback, correlate};
use crate::event::{EventKind, LogEvent};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What happened to an event handed to [`EventStore::record`].
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// Stored as a new history entry.
    Appended { index: usize, event: LogEvent },
    /// A stack frame folded into the PHP event at `owner`.
    Attached { owner: usize, number: u32 },
}

#[derive(Debug, Default)]
pub(crate) struct History {
    pub(crate) events: Vec<LogEvent>,
    /// Category key to history indices, ascending.
    pub(crate) statistics: BTreeMap<String, Vec<usize>>,
}

impl History {
    fn push(&mut self, event: LogEvent) -> usize {
        let index = self.events.len();
        self.statistics
            .entry(event.category())
            .or_default()
            .push(index);
        self.events.push(event);
        index
    }
}

#[derive(Debug, Default)]
pub struct EventStore {
    history: Mutex<History>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        // History is append-only, so a panic mid-append cannot leave a torn entry.
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores an event, first offering standalone PHP frames to the correlator.
    pub fn record(&self, event: LogEvent, lookback: &Lookback) -> Recorded {
        let mut history = self.lock();

        let LogEvent { header, kind } = event;
        let kind = match kind {
            EventKind::PhpStackFrame(frame) => {
                let number = frame.number;
                match correlate(&mut history.events, header.timestamp, frame, lookback) {
                    Ok(owner) => return Recorded::Attached { owner, number },
                    Err(frame) => EventKind::PhpStackFrame(frame),
                }
            }
            other => other,
        };

        let event = LogEvent::new(header, kind);
        let index = history.push(event.clone());
        Recorded::Appended { index, event }
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Known category keys, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.lock().statistics.keys().cloned().collect()
    }
}
