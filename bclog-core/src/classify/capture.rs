use crate::classify::ParseError;
use regex::Captures;
use std::num::ParseIntError;
use std::str::FromStr;

/// Text of a named group, empty when the group did not participate.
pub(crate) fn text<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str())
}

pub(crate) fn owned(caps: &Captures<'_>, name: &str) -> String {
    text(caps, name).to_string()
}

/// Numeric capture. The patterns only admit digits here, so a failure is an
/// internal fault (overflow in practice).
pub(crate) fn number<T>(
    caps: &Captures<'_>,
    format: &'static str,
    field: &'static str,
) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseIntError>,
{
    let value = text(caps, field);
    value.parse::<T>().map_err(|source| ParseError::Number {
        format,
        field,
        value: value.to_string(),
        source,
    })
}
