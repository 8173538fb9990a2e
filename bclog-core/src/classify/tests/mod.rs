mod php_tests;

use crate::classify::{Classification, Classifier};
use crate::event::{EventKind, LogEvent};

pub(super) fn classifier() -> Classifier {
    Classifier::new(2024)
}

pub(super) fn event(line: &str) -> LogEvent {
    match classifier().classify(line) {
        Ok(Some(Classification::Event(event))) => event,
        other => panic!("expected an event for {line:?}, got {other:?}"),
    }
}

pub(super) fn kind(line: &str) -> EventKind {
    event(line).kind
}
