use crate::classify::capture::owned;
use crate::classify::{Framed, ParseError, Parsed};
use crate::event::{EventKind, GenericEvent};
use once_cell::sync::Lazy;
use regex::Regex;

static GENERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*?): (?P<content>.*)$").expect("generic pattern is valid")
});

/// Fallback: `name: content`, split at the first `": "`.
pub(crate) fn parse(framed: &Framed<'_>) -> Result<Option<Parsed>, ParseError> {
    Ok(GENERIC.captures(framed.message).map(|caps| {
        Parsed::Event(EventKind::Generic(GenericEvent {
            name: owned(&caps, "name"),
            content: owned(&caps, "content"),
        }))
    }))
}
