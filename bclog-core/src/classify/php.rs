use crate::classify::capture::{number, owned, text};
use crate::classify::{Framed, ParseError, Parsed};
use crate::event::{EventKind, PhpEvent, PhpStackFrame};
use once_cell::sync::Lazy;
use regex::Regex;

const FORMAT: &str = "php";

/// Syslog escapes embedded newlines as `#012`.
const SYSLOG_NEWLINE: &str = "#012";

static STACK_TRACE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<source>.*?): PHP Stack trace:").expect("php stack trace pattern is valid")
});

static SQL_ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^php: SQL Error \(store_(?P<store>[0-9]+)\): ",
        r"(?P<content>.+) in (?P<file>[^ ]+) on line (?P<line>[0-9]+)",
    ))
    .expect("php sql error pattern is valid")
});

static ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<source>.*?): PHP (?P<level>.*?):  (?P<content>.+) ",
        r"in (?P<file>[^ ]+) on line (?P<line>[0-9]+)",
    ))
    .expect("php error pattern is valid")
});

static UNCAUGHT_EXCEPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^Uncaught exception '(?P<type>.*?)' with message '(?P<message>.*?)' ",
        r"in (?P<file>[^ ]+):(?P<line>[0-9]+)(?P<trace>.*)$",
    ))
    .expect("php uncaught exception pattern is valid")
});

static INLINE_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?P<number>[0-9]+) (?P<file>[^ ]+)\((?P<line>[0-9]+)\): (?P<detail>.*)$")
        .expect("php inline frame pattern is valid")
});

static FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<source>.*?): PHP +(?P<number>[0-9]+)\. ",
        r"(?P<method>.*)\((?P<params>.*)\) (?P<file>[^ ]*):(?P<line>[0-9]+)$",
    ))
    .expect("php frame pattern is valid")
});

static EVAL_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<source>.*?): PHP +(?P<number>[0-9]+)\. ",
        r"(?P<method>[^ ]*) (?P<file>[^ ]*)\((?P<line>[0-9]+)\) ",
        r": eval\(\)'d code:(?P<eval>[0-9]+)$",
    ))
    .expect("php eval frame pattern is valid")
});

pub(crate) fn parse(framed: &Framed<'_>) -> Result<Option<Parsed>, ParseError> {
    let message = framed.message;

    if STACK_TRACE_HEADER.is_match(message) {
        return Ok(Some(Parsed::Anchor));
    }

    if let Some(caps) = SQL_ERROR.captures(message) {
        return Ok(Some(Parsed::Event(EventKind::Php(PhpEvent {
            level: "SQL Error".to_string(),
            content: format!(
                "{} (store ID: {})",
                text(&caps, "content"),
                text(&caps, "store")
            ),
            file: owned(&caps, "file"),
            line: number(&caps, FORMAT, "line")?,
            frames: Vec::new(),
        }))));
    }

    if let Some(caps) = ERROR.captures(message) {
        let mut event = PhpEvent {
            level: owned(&caps, "level"),
            content: owned(&caps, "content"),
            file: owned(&caps, "file"),
            line: number(&caps, FORMAT, "line")?,
            frames: Vec::new(),
        };

        if let Some(exception) = UNCAUGHT_EXCEPTION.captures(text(&caps, "content")) {
            event.content = format!(
                "{}: {}",
                text(&exception, "type"),
                text(&exception, "message")
            );
            event.frames = inline_frames(text(&exception, "trace"))?;
        }

        return Ok(Some(Parsed::Event(EventKind::Php(event))));
    }

    if let Some(caps) = FRAME.captures(message) {
        return Ok(Some(Parsed::Event(EventKind::PhpStackFrame(PhpStackFrame {
            number: number(&caps, FORMAT, "number")?,
            method: owned(&caps, "method"),
            params: owned(&caps, "params"),
            file: owned(&caps, "file"),
            line: number(&caps, FORMAT, "line")?,
            eval_line: None,
        }))));
    }

    if let Some(caps) = EVAL_FRAME.captures(message) {
        return Ok(Some(Parsed::Event(EventKind::PhpStackFrame(PhpStackFrame {
            number: number(&caps, FORMAT, "number")?,
            method: owned(&caps, "method"),
            params: String::new(),
            file: owned(&caps, "file"),
            line: number(&caps, FORMAT, "line")?,
            eval_line: Some(number(&caps, FORMAT, "eval")?),
        }))));
    }

    Ok(None)
}

/// Frames embedded in an uncaught-exception message, e.g.
/// `#012Stack trace:#012#0 /a.php(3): foo()#012#1 {main}`.
fn inline_frames(trace: &str) -> Result<Vec<PhpStackFrame>, ParseError> {
    trace
        .split(SYSLOG_NEWLINE)
        .filter_map(|segment| INLINE_FRAME.captures(segment))
        .map(|caps| {
            Ok(PhpStackFrame {
                number: number(&caps, FORMAT, "number")?,
                method: owned(&caps, "detail"),
                params: String::new(),
                file: owned(&caps, "file"),
                line: number(&caps, FORMAT, "line")?,
                eval_line: None,
            })
        })
        .collect()
}
