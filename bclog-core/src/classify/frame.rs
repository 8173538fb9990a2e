use crate::classify::ParseError;
use crate::classify::capture::text;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) +",
        r"(?P<day>[0-9]{1,2}) ",
        r"(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2}) ",
        r"(?P<source>.*?) ",
        r"(?P<message>.*)$",
    ))
    .expect("syslog preamble pattern is valid")
});

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A raw line split into its syslog preamble and message.
#[derive(Debug, Clone, PartialEq)]
pub struct Framed<'a> {
    pub timestamp: NaiveDateTime,
    pub source: &'a str,
    pub message: &'a str,
    pub raw: &'a str,
}

/// Splits `<month> <day> <time> <source> <message>`.
///
/// Returns `Ok(None)` when the preamble does not match.
pub fn frame(raw: &str, year: i32) -> Result<Option<Framed<'_>>, ParseError> {
    let Some(caps) = PREAMBLE.captures(raw) else {
        return Ok(None);
    };

    let timestamp = syslog_timestamp(
        year,
        text(&caps, "month"),
        text(&caps, "day"),
        [
            text(&caps, "hour"),
            text(&caps, "minute"),
            text(&caps, "second"),
        ],
    )
    .ok_or_else(|| ParseError::Timestamp {
        value: format!(
            "{} {} {}:{}:{}",
            text(&caps, "month"),
            text(&caps, "day"),
            text(&caps, "hour"),
            text(&caps, "minute"),
            text(&caps, "second"),
        ),
    })?;

    Ok(Some(Framed {
        timestamp,
        source: text(&caps, "source"),
        message: text(&caps, "message"),
        raw,
    }))
}

fn syslog_timestamp(year: i32, month: &str, day: &str, hms: [&str; 3]) -> Option<NaiveDateTime> {
    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    let day = day.parse().ok()?;
    let [hour, minute, second] = hms;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(
        hour.parse().ok()?,
        minute.parse().ok()?,
        second.parse().ok()?,
    )
}
