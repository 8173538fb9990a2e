//! Reattaches standalone PHP stack frames to the event that owns them.
//!
//! PHP writes a stack trace as one syslog line per frame, after the error
//! line. Each frame is attached to the most recent [`PhpEvent`] in history.
//! There is no signal that a trace has ended, so the scan can optionally be
//! bounded by [`Lookback`]; without a bound any earlier PHP event is a
//! candidate.
//!
//! [`PhpEvent`]: crate::event::PhpEvent

use crate::event::{LogEvent, PhpStackFrame};
use chrono::NaiveDateTime;
use std::time::Duration;

/// Limits on how far back the correlator looks for an owning event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookback {
    /// Maximum number of history entries inspected, newest first.
    pub max_events: Option<usize>,
    /// Maximum age of the owning event relative to the frame.
    pub max_age: Option<Duration>,
}

impl Lookback {
    pub const UNBOUNDED: Lookback = Lookback {
        max_events: None,
        max_age: None,
    };

    fn admits_age(&self, frame_ts: NaiveDateTime, candidate_ts: NaiveDateTime) -> bool {
        let Some(max_age) = self.max_age else {
            return true;
        };
        // A candidate stamped after the frame counts as zero age.
        let age = (frame_ts - candidate_ts).to_std().unwrap_or(Duration::ZERO);
        age <= max_age
    }
}

/// Attaches `frame` to the newest PHP event in `history` within `lookback`.
///
/// Returns the owner's index, or hands the frame back when there is no owner.
pub fn correlate(
    history: &mut [LogEvent],
    frame_ts: NaiveDateTime,
    frame: PhpStackFrame,
    lookback: &Lookback,
) -> Result<usize, PhpStackFrame> {
    let limit = lookback.max_events.unwrap_or(usize::MAX);

    for (index, candidate) in history.iter_mut().enumerate().rev().take(limit) {
        // History is in arrival order, so everything further back is older still.
        if !lookback.admits_age(frame_ts, candidate.timestamp()) {
            break;
        }

        if let Some(php) = candidate.as_php_mut() {
            php.frames.push(frame);
            return Ok(index);
        }
    }

    Err(frame)
}
