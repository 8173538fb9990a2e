use crate::classify::capture::{number, owned, text};
use crate::classify::{Framed, ParseError, Parsed, bigcommerce_app};
use crate::event::{EventKind, ProcessEvent};
use once_cell::sync::Lazy;
use regex::Regex;

const FORMAT: &str = "process";

/// Name the BigCommerce app process logs under.
pub(crate) const APP_PROCESS: &str = "bigcommerce_app";

static PROCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*?)\[(?P<pid>[0-9]+)\]: (?P<message>.*)$")
        .expect("process pattern is valid")
});

pub(crate) fn parse(framed: &Framed<'_>) -> Result<Option<Parsed>, ParseError> {
    let Some(caps) = PROCESS.captures(framed.message) else {
        return Ok(None);
    };

    let name = text(&caps, "name");
    let pid = number(&caps, FORMAT, "pid")?;
    let message = text(&caps, "message");

    if is_app_process(name) {
        // App output is either structured app output or noise, never a bare process event.
        return Ok(Some(match bigcommerce_app::parse(pid, message)? {
            Some(event) => Parsed::Event(EventKind::BigcommerceApp(event)),
            None => Parsed::Rejected,
        }));
    }

    Ok(Some(Parsed::Event(EventKind::Process(ProcessEvent {
        name: name.to_string(),
        pid,
        content: owned(&caps, "message"),
    }))))
}

/// `bigcommerce_app`, optionally behind one space-separated prefix (`ool bigcommerce_app`).
fn is_app_process(name: &str) -> bool {
    match name.rsplit_once(' ') {
        Some((prefix, last)) => last == APP_PROCESS && !prefix.contains(' '),
        None => name == APP_PROCESS,
    }
}
