//! Text renderings of events and query results.
//!
//! Everything here returns a `String`; writing to the terminal is the
//! presenter's job.

use crate::duration::format_duration;
use crate::event::{EventKind, LogEvent, PhpStackFrame};
use crate::store::{CategorySummary, IndexedEvent};
use owo_colors::OwoColorize;
use std::fmt::Write;
use std::time::Duration;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Color,
}

impl Style {
    fn tag(self, text: &str, severe: bool) -> String {
        match (self, severe) {
            (Style::Plain, _) => text.to_string(),
            (Style::Color, false) => text.yellow().to_string(),
            (Style::Color, true) => text.yellow().on_red().to_string(),
        }
    }

    fn discriminator(self, text: &str, severe: bool) -> String {
        match (self, severe) {
            (Style::Plain, _) => text.to_string(),
            (Style::Color, false) => text.cyan().to_string(),
            (Style::Color, true) => text.cyan().on_red().to_string(),
        }
    }

    fn heading(self, text: &str) -> String {
        match self {
            Style::Plain => text.to_string(),
            Style::Color => text.bold().to_string(),
        }
    }
}

/// The fields that set an event apart from others of its kind, and its content.
fn short_fields(event: &LogEvent) -> (String, String) {
    match &event.kind {
        EventKind::NginxAccess(e) => (
            format!("{}-{}", e.request.method, e.status_code),
            e.request.uri.clone(),
        ),
        EventKind::NginxError(e) => (e.level.clone(), e.content.clone()),
        EventKind::Process(e) => (format!("{}-{}", e.name, e.pid), e.content.clone()),
        EventKind::BigcommerceApp(e) => (
            format!("{}-{}", e.level, e.store.store_id),
            e.content.clone(),
        ),
        EventKind::Php(e) => (
            format!("{}-{}-{}", e.level, e.file, e.line),
            e.content.clone(),
        ),
        EventKind::PhpStackFrame(f) => (
            format!("{}-{}-{}", f.number, f.file, f.line),
            f.method.clone(),
        ),
        EventKind::Generic(e) => (e.name.clone(), e.content.clone()),
    }
}

/// `[index]  timestamp  tag  discriminator  content`
pub fn short_line(index: usize, event: &LogEvent, style: Style) -> String {
    let severe = event.is_severe();
    let (discriminator, content) = short_fields(event);

    format!(
        "[{index}]  {}  {}  {}  {content}",
        event.timestamp().format(TIME_FORMAT),
        style.tag(event.tag(), severe),
        style.discriminator(&discriminator, severe),
    )
}

/// A short line printed while the prompt may be showing: it overwrites the
/// pending `> ` and redraws it afterwards.
pub fn live_line(index: usize, event: &LogEvent, style: Style) -> String {
    format!("\r{}\n{PROMPT}", short_line(index, event, style))
}

/// Label/value rows with the values aligned.
#[derive(Default)]
struct Fields {
    rows: Vec<(&'static str, String)>,
}

impl Fields {
    fn push(&mut self, label: &'static str, value: impl ToString) -> &mut Self {
        self.rows.push((label, value.to_string()));
        self
    }

    fn write_to(&self, out: &mut String) {
        let width = self.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0) + 1;
        for (label, value) in &self.rows {
            let _ = writeln!(out, "{:<width$} {value}", format!("{label}:"));
        }
    }
}

fn title(event: &LogEvent) -> &'static str {
    match &event.kind {
        EventKind::NginxAccess(_) => "NGINX ACCESS LOG EVENT",
        EventKind::NginxError(_) => "NGINX ERROR LOG EVENT",
        EventKind::Process(_) => "PROCESS LOG EVENT",
        EventKind::BigcommerceApp(_) => "BIGCOMMERCE APP EVENT",
        EventKind::Php(_) => "PHP LOG EVENT",
        EventKind::PhpStackFrame(_) => "PHP STACK TRACE EVENT",
        EventKind::Generic(_) => "GENERIC LOG EVENT",
    }
}

fn frame_location(frame: &PhpStackFrame) -> String {
    match frame.eval_line {
        Some(eval) => format!("{}({}) : eval()'d code:{eval}", frame.file, frame.line),
        None => format!("{}:{}", frame.file, frame.line),
    }
}

/// Every field of the event, with attached PHP frames as a numbered list.
pub fn full_view(event: &LogEvent, style: Style) -> String {
    let banner = format!("---------- {} ----------", title(event));

    let mut fields = Fields::default();
    fields
        .push("SyslogTime", event.timestamp().format(TIME_FORMAT))
        .push("Source", &event.header.source)
        .push("Category", event.category());

    let mut frames: &[PhpStackFrame] = &[];

    match &event.kind {
        EventKind::NginxAccess(e) => {
            fields
                .push("Hostname", &e.hostname)
                .push("IpAddress", &e.ip_address)
                .push("Time", e.time.format(TIME_FORMAT))
                .push("Method", &e.request.method)
                .push("Uri", &e.request.uri)
                .push("ProtocolVersion", &e.request.protocol_version)
                .push("StatusCode", e.status_code)
                .push("ContentLength", e.content_length);
        }
        EventKind::NginxError(e) => {
            fields
                .push("LogLevel", &e.level)
                .push("Content", &e.content)
                .push("Client", &e.client)
                .push("Server", &e.server)
                .push("Method", &e.request.method)
                .push("Uri", &e.request.uri)
                .push("ProtocolVersion", &e.request.protocol_version)
                .push("Host", &e.host);
            if let Some(referrer) = &e.referrer {
                fields.push("Referrer", referrer);
            }
        }
        EventKind::Process(e) => {
            fields
                .push("Name", &e.name)
                .push("ProcessId", e.pid)
                .push("Content", &e.content);
        }
        EventKind::BigcommerceApp(e) => {
            fields
                .push("ProcessId", e.pid)
                .push("LogLevel", &e.level)
                .push("Content", &e.content)
                .push("Args", &e.args)
                .push("StoreId", e.store.store_id)
                .push("StoreHash", &e.store.store_hash)
                .push("Domain", &e.store.domain)
                .push("Message", &e.message);
        }
        EventKind::Php(e) => {
            fields
                .push("LogLevel", &e.level)
                .push("Content", &e.content)
                .push("File", &e.file)
                .push("Line", e.line);
            frames = &e.frames;
        }
        EventKind::PhpStackFrame(f) => {
            fields
                .push("Number", f.number)
                .push("Method", &f.method)
                .push("Params", &f.params)
                .push("Location", frame_location(f));
        }
        EventKind::Generic(e) => {
            fields.push("Name", &e.name).push("Content", &e.content);
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "\n{}", style.heading(&banner));
    fields.write_to(&mut out);

    if !frames.is_empty() {
        let _ = writeln!(out, "\n{}", style.heading("Stack trace"));
        for frame in frames {
            let _ = writeln!(
                out,
                "{:>4}.  {}  {}",
                frame.number,
                frame.method,
                frame_location(frame)
            );
        }
    }

    let _ = writeln!(out, "{}", "-".repeat(banner.len()));
    out
}

pub fn show_report(events: &[IndexedEvent], style: Style) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", style.heading("---------- SHOW ----------"));
    if events.is_empty() {
        out.push_str("no matching events\n");
    }
    for e in events {
        let _ = writeln!(out, "{}", short_line(e.index, &e.event, style));
    }
    let _ = writeln!(out, "--------------------------");
    out
}

pub fn summary_report(window: Duration, rows: &[CategorySummary], style: Style) -> String {
    let heading = format!("SUMMARY (LAST {})", format_duration(window));

    let mut out = String::new();
    let _ = writeln!(out, "\n{}", style.heading(&heading));

    if rows.is_empty() {
        out.push_str("no events in window\n");
        return out;
    }

    let width = rows.iter().map(|r| r.category.len()).max().unwrap_or(0);
    for row in rows {
        let noun = if row.count == 1 { "event" } else { "events" };
        let _ = writeln!(
            out,
            "{:<width$}  {:>6} {noun:<6}  Last {} ago",
            row.category,
            row.count,
            format_duration(row.since_last),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classification, Classifier};
    use crate::event::PhpStackFrame;
    use pretty_assertions::assert_eq;

    fn event(message: &str) -> LogEvent {
        let line = format!("Mar  5 10:00:00 web01 {message}");
        match Classifier::new(2024).classify(&line) {
            Ok(Some(Classification::Event(event))) => event,
            other => panic!("expected an event, got {other:?}"),
        }
    }

    #[test]
    fn short_line_plain() {
        let event = event(
            r#"nginx: shop 10.0.0.1 - - [05/Mar/2024:10:00:00 +0000]  "GET /x HTTP/1.1" 404 123 "-" "-" 0.1"#,
        );

        assert_eq!(
            short_line(7, &event, Style::Plain),
            "[7]  2024-03-05 10:00:00  nginx-access  GET-404  /x"
        );
    }

    #[test]
    fn live_line_redraws_the_prompt() {
        let event = event("kernel: eth0 up");

        assert_eq!(
            live_line(3, &event, Style::Plain),
            "\r[3]  2024-03-05 10:00:00  generic  kernel  eth0 up\n> "
        );
    }

    #[test]
    fn short_line_color_highlights_severe_events() {
        let event = event("php: PHP Fatal error:  boom in /a.php on line 3");

        let line = short_line(0, &event, Style::Color);

        assert!(line.contains(&"php".yellow().on_red().to_string()));
        assert!(line.ends_with("boom"));
    }

    #[test]
    fn full_view_lists_attached_frames() {
        let mut event = event("php: PHP Fatal error:  boom in /a.php on line 3");
        let php = event.as_php_mut().unwrap();
        php.frames.push(PhpStackFrame {
            number: 1,
            method: "{main}".to_string(),
            file: "/index.php".to_string(),
            line: 0,
            ..Default::default()
        });
        php.frames.push(PhpStackFrame {
            number: 2,
            method: "include()".to_string(),
            file: "/a.php".to_string(),
            line: 17,
            eval_line: Some(4),
            ..Default::default()
        });

        let view = full_view(&event, Style::Plain);

        assert!(view.contains("---------- PHP LOG EVENT ----------"));
        assert!(view.contains("LogLevel:   Fatal error\n"));
        assert!(view.contains("   1.  {main}  /index.php:0\n"));
        assert!(view.contains("   2.  include()  /a.php(17) : eval()'d code:4\n"));
    }

    #[test]
    fn summary_report_rows() {
        let rows = vec![
            CategorySummary {
                category: "nginx-access-200".to_string(),
                count: 12,
                since_last: Duration::from_secs(4),
            },
            CategorySummary {
                category: "process".to_string(),
                count: 1,
                since_last: Duration::from_secs(240),
            },
        ];

        let report = summary_report(Duration::from_secs(3_600), &rows, Style::Plain);

        assert_eq!(
            report,
            concat!(
                "\nSUMMARY (LAST 1h0m0s)\n",
                "nginx-access-200      12 events  Last 4s ago\n",
                "process                1 event   Last 4m0s ago\n",
            )
        );
    }

    #[test]
    fn empty_show_report() {
        let report = show_report(&[], Style::Plain);

        assert!(report.contains("no matching events"));
    }
}
