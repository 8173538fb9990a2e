//! Moving raw lines from a source into the event store.

mod pipeline;
mod source;

pub use pipeline::{IngestReport, Ingestor, LineOutcome};
pub use source::{CommandSource, LineSource, ReaderSource};
