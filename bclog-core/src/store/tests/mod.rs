mod query_tests;

use crate::classify::{Classification, Classifier};
use crate::event::LogEvent;

/// Classifies a syslog message stamped `Mar  5 10:<minute>:<second>`.
pub(super) fn event_at(minute: u32, second: u32, message: &str) -> LogEvent {
    let line = format!("Mar  5 10:{minute:02}:{second:02} web01 {message}");
    match Classifier::new(2024).classify(&line) {
        Ok(Some(Classification::Event(event))) => event,
        other => panic!("expected an event for {line:?}, got {other:?}"),
    }
}

pub(super) fn access(minute: u32, status: u16) -> LogEvent {
    event_at(
        minute,
        0,
        &format!(
            r#"nginx: shop.example.com 10.0.0.1 - - [05/Mar/2024:10:{minute:02}:00 +0000]  "GET /p HTTP/1.1" {status} 10 "-" "-" 0.1"#
        ),
    )
}

pub(super) fn fatal(minute: u32, second: u32) -> LogEvent {
    event_at(
        minute,
        second,
        "php: PHP Fatal error:  Allowed memory exhausted in /var/www/a.php on line 7",
    )
}

pub(super) fn frame(minute: u32, second: u32, number: u32) -> LogEvent {
    event_at(
        minute,
        second,
        &format!("php: PHP {number:>3}. Worker->run() /var/www/w.php:{number}0"),
    )
}
