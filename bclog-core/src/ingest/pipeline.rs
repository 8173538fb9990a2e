use crate::classify::{Classification, Classifier};
use crate::event::EventKind;
use crate::ingest::LineSource;
use crate::present::Presenter;
use crate::runtime::RuntimeHandle;
use crate::store::{EventStore, Recorded};
use std::io;
use std::sync::Arc;

/// What happened to one raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// No parser matched.
    Unparseable,
    /// A parser matched but the payload was invalid; nothing was stored.
    Discarded,
    /// A PHP stack trace header.
    Anchor,
    Recorded { index: usize, suppressed: bool },
    /// A stack frame folded into an earlier PHP event.
    Attached { owner: usize, suppressed: bool },
}

/// Line counts for one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub lines: u64,
    pub recorded: u64,
    pub attached: u64,
    pub suppressed: u64,
    pub unparseable: u64,
    pub discarded: u64,
}

impl IngestReport {
    fn count(&mut self, outcome: LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Unparseable => self.unparseable += 1,
            LineOutcome::Discarded => self.discarded += 1,
            LineOutcome::Anchor => {}
            LineOutcome::Recorded { suppressed, .. } => {
                self.recorded += 1;
                self.suppressed += u64::from(suppressed);
            }
            LineOutcome::Attached { suppressed, .. } => {
                self.attached += 1;
                self.suppressed += u64::from(suppressed);
            }
        }
    }
}

/// Classifies, stores and displays lines.
pub struct Ingestor {
    classifier: Classifier,
    store: Arc<EventStore>,
    runtime: Arc<RuntimeHandle>,
    presenter: Arc<dyn Presenter>,
}

impl Ingestor {
    pub fn new(
        classifier: Classifier,
        store: Arc<EventStore>,
        runtime: Arc<RuntimeHandle>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            classifier,
            store,
            runtime,
            presenter,
        }
    }

    pub fn ingest_line(&self, raw: &str) -> LineOutcome {
        let classification = match self.classifier.classify(raw) {
            Ok(Some(classification)) => classification,
            Ok(None) => {
                tracing::warn!(line = raw, "unparseable line");
                return LineOutcome::Unparseable;
            }
            Err(err) if err.is_internal_fault() => {
                tracing::error!(line = raw, error = %err, "internal parse fault, event dropped");
                return LineOutcome::Discarded;
            }
            Err(err) => {
                tracing::warn!(line = raw, error = %err, "malformed payload, event discarded");
                return LineOutcome::Discarded;
            }
        };

        let event = match classification {
            Classification::Event(event) => event,
            Classification::StackTraceAnchor => {
                tracing::debug!(line = raw, "php stack trace header");
                return LineOutcome::Anchor;
            }
        };

        // One snapshot per line; a concurrent reload applies from the next line.
        let state = self.runtime.load();

        // The store folds attached frames into their owner; keep the line for display.
        let frame_line = matches!(event.kind, EventKind::PhpStackFrame(_)).then(|| event.clone());

        match self.store.record(event, &state.lookback) {
            Recorded::Attached { owner, number } => {
                tracing::debug!(owner, frame = number, "stack frame attached");
                let suppressed = match &frame_line {
                    Some(frame) => {
                        let suppressed = state.suppression.suppresses(frame);
                        if !suppressed {
                            self.presenter.live_frame(owner, frame);
                        }
                        suppressed
                    }
                    None => false,
                };
                LineOutcome::Attached { owner, suppressed }
            }
            Recorded::Appended { index, event } => {
                let suppressed = state.suppression.suppresses(&event);
                if !suppressed {
                    self.presenter.live(index, &event);
                }
                LineOutcome::Recorded { index, suppressed }
            }
        }
    }

    /// Ingests until the source is exhausted or fails.
    pub fn run(&self, source: &mut dyn LineSource) -> io::Result<IngestReport> {
        let mut report = IngestReport::default();
        tracing::info!(source = %source.describe(), "ingest started");

        while let Some(line) = source.next_line()? {
            report.count(self.ingest_line(&line));
        }

        tracing::info!(
            lines = report.lines,
            recorded = report.recorded,
            attached = report.attached,
            unparseable = report.unparseable,
            discarded = report.discarded,
            "ingest finished"
        );
        Ok(report)
    }
}
