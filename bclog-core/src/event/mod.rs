//! Typed log events.
//!
//! Every classified line becomes a [`LogEvent`]: a header shared by all formats
//! (syslog timestamp, source host and the raw line) plus an [`EventKind`]
//! holding the format-specific fields.
//!
//! The category key returned by [`LogEvent::category`] is the grouping used by
//! suppression rules, the statistics index and the `show` command.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub header: EventHeader,
    pub kind: EventKind,
}

/// Fields extracted by framing, common to every event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventHeader {
    /// Syslog preamble time. Syslog carries no year, so the classifier supplies one.
    pub timestamp: NaiveDateTime,
    pub source: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    NginxAccess(NginxAccessEvent),
    NginxError(NginxErrorEvent),
    Process(ProcessEvent),
    BigcommerceApp(BigcommerceAppEvent),
    Php(PhpEvent),
    PhpStackFrame(PhpStackFrame),
    Generic(GenericEvent),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NginxRequest {
    pub method: String,
    pub uri: String,
    pub protocol_version: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NginxAccessEvent {
    pub hostname: String,
    pub ip_address: String,
    pub time: DateTime<FixedOffset>,
    pub request: NginxRequest,
    pub status_code: u16,
    pub content_length: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NginxErrorEvent {
    pub level: String,
    pub content: String,
    pub client: String,
    pub server: String,
    pub request: NginxRequest,
    pub host: String,
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessEvent {
    pub name: String,
    pub pid: u32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BigcommerceAppEvent {
    /// Pid of the wrapping `bigcommerce_app[pid]` process line.
    pub pid: u32,
    pub level: String,
    pub content: String,
    pub args: String,
    pub store: StoreContext,
    /// The app message before parsing.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreContext {
    pub store_id: u64,
    pub store_hash: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhpEvent {
    pub level: String,
    pub content: String,
    pub file: String,
    pub line: u32,
    /// Frames in arrival order, either parsed inline or attached by the correlator.
    pub frames: Vec<PhpStackFrame>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhpStackFrame {
    pub number: u32,
    pub method: String,
    pub params: String,
    pub file: String,
    pub line: u32,
    /// Line inside eval()'d code, for frames that point into it.
    pub eval_line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericEvent {
    pub name: String,
    pub content: String,
}

pub const PHP_STACK_TRACE_CATEGORY: &str = "php-stack-trace";

impl LogEvent {
    pub fn new(header: EventHeader, kind: EventKind) -> Self {
        Self { header, kind }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.header.timestamp
    }

    /// Category key used for suppression and aggregation.
    pub fn category(&self) -> String {
        match &self.kind {
            EventKind::NginxAccess(e) => format!("nginx-access-{}", e.status_code),
            EventKind::NginxError(e) => format!("nginx-error-{}", e.level),
            EventKind::Process(_) => "process".to_string(),
            EventKind::BigcommerceApp(e) => format!("bigcommerce-app-{}", e.level),
            EventKind::Php(e) => format!("php-{}", e.level),
            EventKind::PhpStackFrame(_) => PHP_STACK_TRACE_CATEGORY.to_string(),
            EventKind::Generic(e) => format!("generic-{}", e.name),
        }
    }

    /// Short format tag shown in one-line renderings.
    pub fn tag(&self) -> &'static str {
        match &self.kind {
            EventKind::NginxAccess(_) => "nginx-access",
            EventKind::NginxError(_) => "nginx-error",
            EventKind::Process(_) => "process",
            EventKind::BigcommerceApp(_) => "bigcommerce-app",
            EventKind::Php(_) => "php",
            EventKind::PhpStackFrame(_) => PHP_STACK_TRACE_CATEGORY,
            EventKind::Generic(_) => "generic",
        }
    }

    /// Whether the event describes a failure worth highlighting.
    pub fn is_severe(&self) -> bool {
        match &self.kind {
            EventKind::NginxAccess(e) => e.status_code >= 500,
            EventKind::NginxError(e) => e.level == "error",
            EventKind::Php(e) => matches!(
                e.level.as_str(),
                "Fatal error" | "Catchable fatal error" | "Parse error" | "SQL Error"
            ),
            _ => false,
        }
    }

    pub fn as_php_mut(&mut self) -> Option<&mut PhpEvent> {
        match &mut self.kind {
            EventKind::Php(e) => Some(e),
            _ => None,
        }
    }
}
