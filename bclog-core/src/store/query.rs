use super::{EventStore, History};
use crate::event::LogEvent;
use chrono::NaiveDateTime;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no event at index {index} (history has {len} events)")]
    OutOfRange { index: usize, len: usize },
}

/// Category selector for `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Exact(String),
}

/// `*` selects every category, anything else one exact key.
impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        match s {
            "*" => CategoryFilter::All,
            key => CategoryFilter::Exact(key.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEvent {
    pub index: usize,
    pub event: LogEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    /// Time between the category's newest event and the newest event overall.
    pub since_last: Duration,
}

/// Elapsed time from `ts` to `last`; events stamped after `last` count as zero.
fn elapsed(last: NaiveDateTime, ts: NaiveDateTime) -> Duration {
    (last - ts).to_std().unwrap_or(Duration::ZERO)
}

impl History {
    fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.events.last().map(LogEvent::timestamp)
    }

    fn in_window(&self, last: NaiveDateTime, index: usize, window: Duration) -> bool {
        elapsed(last, self.events[index].timestamp()) <= window
    }
}

impl EventStore {
    /// Timestamp of the most recently appended event.
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.lock().last_timestamp()
    }

    /// Events in `filter` within `window` of the last event, in arrival order.
    pub fn show(&self, filter: &CategoryFilter, window: Duration) -> Vec<IndexedEvent> {
        let history = self.lock();
        let Some(last) = history.last_timestamp() else {
            return Vec::new();
        };

        let snapshot = |index: usize| IndexedEvent {
            index,
            event: history.events[index].clone(),
        };

        match filter {
            CategoryFilter::All => (0..history.events.len())
                .filter(|&i| history.in_window(last, i, window))
                .map(snapshot)
                .collect(),
            CategoryFilter::Exact(key) => history
                .statistics
                .get(key)
                .map(|indices| {
                    indices
                        .iter()
                        .copied()
                        .filter(|&i| history.in_window(last, i, window))
                        .map(snapshot)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Per-category counts within `window`, sorted by category key.
    ///
    /// Categories with no event in the window are left out.
    pub fn summary(&self, window: Duration) -> Vec<CategorySummary> {
        let history = self.lock();
        let Some(last) = history.last_timestamp() else {
            return Vec::new();
        };

        history
            .statistics
            .iter()
            .filter_map(|(category, indices)| {
                let count = indices
                    .iter()
                    .filter(|&&i| history.in_window(last, i, window))
                    .count();
                if count == 0 {
                    return None;
                }

                let newest = *indices.last()?;
                Some(CategorySummary {
                    category: category.clone(),
                    count,
                    since_last: elapsed(last, history.events[newest].timestamp()),
                })
            })
            .collect()
    }

    /// Snapshot of the event at `index`.
    pub fn detail(&self, index: usize) -> Result<LogEvent, QueryError> {
        let history = self.lock();
        history
            .events
            .get(index)
            .cloned()
            .ok_or(QueryError::OutOfRange {
                index,
                len: history.events.len(),
            })
    }
}
