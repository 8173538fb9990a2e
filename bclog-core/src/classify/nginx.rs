use crate::classify::capture::{number, owned, text};
use crate::classify::{Framed, ParseError, Parsed};
use crate::event::{EventKind, NginxAccessEvent, NginxErrorEvent, NginxRequest};
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

const FORMAT: &str = "nginx";

static ACCESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^nginx: (?P<hostname>.*?) (?P<ip>[0-9.]*) (?:.*?) (?:.*?) ",
        r"\[(?P<time>[0-9]{2}/(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)/[0-9]{4}",
        r":[0-9]{2}:[0-9]{2}:[0-9]{2} [+-][0-9]{4})\]  ",
        r#""(?P<method>.*?) (?P<uri>.*?) (?P<protocol>.*?)" "#,
        r"(?P<status>[0-9]+) (?P<length>[0-9]+) (?:.*?) (?:.*?) (?:.*?)$",
    ))
    .expect("nginx access pattern is valid")
});

static ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^nginx:  \[(?P<level>.*?)\] (?P<content>.*?), ",
        r"client: (?P<client>.*), server: (?P<server>.*), ",
        r#"request: "(?P<method>.*?) (?P<uri>.*?) (?P<protocol>.*?)", "#,
        r"host: (?P<host>.*?)(?:, referrer: (?P<referrer>.*?)|)$",
    ))
    .expect("nginx error pattern is valid")
});

const ACCESS_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

pub(crate) fn parse(framed: &Framed<'_>) -> Result<Option<Parsed>, ParseError> {
    if let Some(caps) = ACCESS.captures(framed.message) {
        let time = text(&caps, "time");
        let time = DateTime::parse_from_str(time, ACCESS_TIME_FORMAT).map_err(|source| {
            ParseError::Time {
                format: FORMAT,
                value: time.to_string(),
                source,
            }
        })?;

        return Ok(Some(Parsed::Event(EventKind::NginxAccess(NginxAccessEvent {
            hostname: owned(&caps, "hostname"),
            ip_address: owned(&caps, "ip"),
            time,
            request: NginxRequest {
                method: owned(&caps, "method"),
                uri: owned(&caps, "uri"),
                protocol_version: owned(&caps, "protocol"),
            },
            status_code: number(&caps, FORMAT, "status")?,
            content_length: number(&caps, FORMAT, "length")?,
        }))));
    }

    let Some(caps) = ERROR.captures(framed.message) else {
        return Ok(None);
    };

    Ok(Some(Parsed::Event(EventKind::NginxError(NginxErrorEvent {
        level: owned(&caps, "level"),
        content: owned(&caps, "content"),
        client: owned(&caps, "client"),
        server: owned(&caps, "server"),
        request: NginxRequest {
            method: owned(&caps, "method"),
            uri: owned(&caps, "uri"),
            protocol_version: owned(&caps, "protocol"),
        },
        host: owned(&caps, "host"),
        referrer: caps.name("referrer").map(|m| m.as_str().to_string()),
    }))))
}
