use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins; otherwise `default` applies.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize diagnostics logging.
///
/// Stdout belongs to the interactive session, so diagnostics never go there:
/// - without a log file, compact human-readable lines at `warn` and above go
///   to stderr, where they share the terminal with the session;
/// - with a log file, `info` and above as JSON with flattened event fields is appended to it
///   through a non-blocking writer.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let Some(path) = log_file else {
        fmt()
            .with_env_filter(env_filter("warn"))
            .with_writer(std::io::stderr)
            .compact()
            .init();
        return None;
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "bclog.log".into());

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(writer)
        .with_ansi(false)
        .json()
        .flatten_event(true)
        .init();

    Some(guard)
}
