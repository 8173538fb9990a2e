//! Terminal output.
//!
//! The ingest thread and the command loop both write through a [`Presenter`].
//! Tests swap in a capturing implementation.

use crate::event::LogEvent;
use crate::render::{self, Style};
use crate::store::{CategorySummary, IndexedEvent};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::time::Duration;

pub trait Presenter: Send + Sync {
    /// An event as it arrives.
    fn live(&self, index: usize, event: &LogEvent);

    /// A stack frame line that was attached to the event at `owner`.
    fn live_frame(&self, owner: usize, frame: &LogEvent);

    fn show(&self, events: &[IndexedEvent]);

    fn summary(&self, window: Duration, rows: &[CategorySummary]);

    fn detail(&self, index: usize, event: &LogEvent);

    fn notice(&self, message: &str);

    fn error(&self, message: &str);

    fn clear(&self);

    fn prompt(&self);
}

/// Writes to stdout, optionally with ANSI colors.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPresenter {
    style: Style,
}

impl TerminalPresenter {
    pub fn new(color: bool) -> Self {
        Self {
            style: if color { Style::Color } else { Style::Plain },
        }
    }

    fn write(&self, text: &str) {
        let mut out = io::stdout().lock();
        // A closed stdout ends the session through stdin; nothing to do here.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl Presenter for TerminalPresenter {
    fn live(&self, index: usize, event: &LogEvent) {
        self.write(&render::live_line(index, event, self.style));
    }

    fn live_frame(&self, owner: usize, frame: &LogEvent) {
        self.write(&render::live_line(owner, frame, self.style));
    }

    fn show(&self, events: &[IndexedEvent]) {
        self.write(&render::show_report(events, self.style));
    }

    fn summary(&self, window: Duration, rows: &[CategorySummary]) {
        self.write(&render::summary_report(window, rows, self.style));
    }

    fn detail(&self, _index: usize, event: &LogEvent) {
        self.write(&render::full_view(event, self.style));
    }

    fn notice(&self, message: &str) {
        self.write(&format!("{message}\n"));
    }

    fn error(&self, message: &str) {
        let line = match self.style {
            Style::Plain => format!("error: {message}\n"),
            Style::Color => format!("{} {message}\n", "error:".red().bold()),
        };
        self.write(&line);
    }

    fn clear(&self) {
        self.write("\x1b[2J\x1b[H");
    }

    fn prompt(&self) {
        self.write(render::PROMPT);
    }
}
