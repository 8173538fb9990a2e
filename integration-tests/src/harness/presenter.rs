use bclog_core::event::{EventKind, LogEvent};
use bclog_core::present::Presenter;
use bclog_core::store::{CategorySummary, IndexedEvent};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// One call made on the presenter.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Live { index: usize, category: String },
    /// A stack frame shown under the event it was attached to.
    LiveFrame { owner: usize, number: u32 },
    Show(Vec<IndexedEvent>),
    Summary {
        window: Duration,
        rows: Vec<CategorySummary>,
    },
    Detail { index: usize, event: LogEvent },
    Notice(String),
    Error(String),
    Clear,
    Prompt,
}

/// Records presenter calls instead of writing to a terminal.
#[derive(Debug, Default)]
pub struct CapturingPresenter {
    outputs: Mutex<Vec<Output>>,
}

impl CapturingPresenter {
    fn push(&self, output: Output) {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(output);
    }

    /// Drains everything recorded so far.
    pub fn take(&self) -> Vec<Output> {
        std::mem::take(&mut *self.outputs.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Frames shown live as `(owner, number)`, draining the recording.
    pub fn take_live_frames(&self) -> Vec<(usize, u32)> {
        self.take()
            .into_iter()
            .filter_map(|output| match output {
                Output::LiveFrame { owner, number } => Some((owner, number)),
                _ => None,
            })
            .collect()
    }

    /// Indices of events shown live, draining the recording.
    pub fn take_live(&self) -> Vec<usize> {
        self.take()
            .into_iter()
            .filter_map(|output| match output {
                Output::Live { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for CapturingPresenter {
    fn live(&self, index: usize, event: &LogEvent) {
        self.push(Output::Live {
            index,
            category: event.category(),
        });
    }

    fn live_frame(&self, owner: usize, frame: &LogEvent) {
        let number = match &frame.kind {
            EventKind::PhpStackFrame(frame) => frame.number,
            other => panic!("expected a stack frame, got {other:?}"),
        };
        self.push(Output::LiveFrame { owner, number });
    }

    fn show(&self, events: &[IndexedEvent]) {
        self.push(Output::Show(events.to_vec()));
    }

    fn summary(&self, window: Duration, rows: &[CategorySummary]) {
        self.push(Output::Summary {
            window,
            rows: rows.to_vec(),
        });
    }

    fn detail(&self, index: usize, event: &LogEvent) {
        self.push(Output::Detail {
            index,
            event: event.clone(),
        });
    }

    fn notice(&self, message: &str) {
        self.push(Output::Notice(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Output::Error(message.to_string()));
    }

    fn clear(&self) {
        self.push(Output::Clear);
    }

    fn prompt(&self) {
        self.push(Output::Prompt);
    }
}
