use std::num::ParseIntError;
use thiserror::Error;

/// Failure to build an event from a line that a parser already claimed.
///
/// Every variant is scoped to the single line under construction; the ingest
/// loop reports it and moves on.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid syslog timestamp '{value}'")]
    Timestamp { value: String },

    #[error("{format}: capture '{field}' is not a valid number: '{value}'")]
    Number {
        format: &'static str,
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{format}: invalid time '{value}'")]
    Time {
        format: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("bigcommerce-app: malformed store context {json}")]
    StoreContext {
        json: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    /// True when a pattern matched but a capture it guarantees did not convert.
    ///
    /// These point at a defect in a pattern/parser pairing rather than at bad input.
    pub fn is_internal_fault(&self) -> bool {
        !matches!(self, ParseError::StoreContext { .. })
    }
}
