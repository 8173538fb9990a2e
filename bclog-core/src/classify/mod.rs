//! Line classification.
//!
//! A raw syslog line goes through two stages:
//!
//! 1. framing: the `<month> <day> <time> <source>` preamble is split off;
//! 2. format dispatch: the message is offered to each format parser in a
//!    fixed order (nginx, process wrapper, php, generic). The first parser
//!    that claims the message decides the outcome.
//!
//! A parser can also claim a message and reject it (an app-process line
//! that is not valid app output). In that case the line is unparseable and
//! later parsers are not consulted.

mod bigcommerce_app;
mod capture;
mod error;
mod frame;
mod generic;
mod nginx;
mod php;
mod process;

#[cfg(test)]
mod tests;

pub use error::ParseError;
pub use frame::{Framed, frame};

use crate::event::{EventHeader, EventKind, LogEvent};
use chrono::{Datelike, Local, NaiveDateTime};
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

/// Result of classifying a line that a parser understood.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Event(LogEvent),
    /// A `PHP Stack trace:` header. Carries no payload; frames follow on later lines.
    StackTraceAnchor,
}

/// What a single format parser made of a message.
#[derive(Debug)]
pub(crate) enum Parsed {
    Event(EventKind),
    Anchor,
    /// Claimed by the parser but not valid for it; the whole line fails.
    Rejected,
}

type ParserFn = fn(&Framed<'_>) -> Result<Option<Parsed>, ParseError>;

const PARSERS: [(&str, ParserFn); 4] = [
    ("nginx", nginx::parse),
    ("process", process::parse),
    ("php", php::parse),
    ("generic", generic::parse),
];

/// Classifies lines, stamping syslog timestamps with a tracked year.
///
/// Syslog carries no year. The classifier starts from a given year and
/// advances it when a December line is followed by a January line.
#[derive(Debug)]
pub struct Classifier {
    year: AtomicI32,
    /// Month of the most recent framed line; 0 before the first.
    last_month: AtomicU32,
}

impl Classifier {
    /// `year` is stamped on syslog timestamps until the log rolls over into January.
    pub fn new(year: i32) -> Self {
        Self {
            year: AtomicI32::new(year),
            last_month: AtomicU32::new(0),
        }
    }

    pub fn for_current_year() -> Self {
        Self::new(Local::now().year())
    }

    /// The year currently stamped on timestamps.
    pub fn year(&self) -> i32 {
        self.year.load(Ordering::Relaxed)
    }

    /// Classifies one raw line.
    ///
    /// `Ok(None)` means no parser matched (or framing failed). Errors are
    /// scoped to this line.
    pub fn classify(&self, raw: &str) -> Result<Option<Classification>, ParseError> {
        let raw = raw.trim_end_matches(['\r', '\n']);

        let Some(mut framed) = frame(raw, self.year())? else {
            return Ok(None);
        };
        self.track_year(&mut framed.timestamp);

        for (name, parse) in PARSERS {
            let Some(parsed) = parse(&framed)? else {
                continue;
            };

            tracing::trace!(parser = name, "line claimed");

            return Ok(match parsed {
                Parsed::Event(kind) => Some(Classification::Event(LogEvent::new(
                    EventHeader {
                        timestamp: framed.timestamp,
                        source: framed.source.to_string(),
                        raw: raw.to_string(),
                    },
                    kind,
                ))),
                Parsed::Anchor => Some(Classification::StackTraceAnchor),
                Parsed::Rejected => None,
            });
        }

        Ok(None)
    }

    /// Moves to the next year on a December to January step.
    fn track_year(&self, timestamp: &mut NaiveDateTime) {
        let month = timestamp.month();
        let previous = self.last_month.swap(month, Ordering::Relaxed);
        if previous != 12 || month != 1 {
            return;
        }

        let year = self.year.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(year, "syslog timestamps rolled over into a new year");

        // January dates exist in every year.
        if let Some(rolled) = timestamp.with_year(year) {
            *timestamp = rolled;
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::for_current_year()
    }
}
