use crate::classify::Classifier;
use crate::conf::types::SourceConfig;
use crate::conf::{ConfigError, ConfigLocation, load_or_default};
use crate::ingest::{CommandSource, IngestReport, Ingestor, LineSource, ReaderSource};
use crate::present::{Presenter, TerminalPresenter};
use crate::repl::Session;
use crate::runtime::{RuntimeHandle, build_runtime_state};
use crate::store::EventStore;
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Path to the config file (default: ~/.config/bclog/config.hcl)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read log lines from a file instead of the configured source
    #[arg(long, conflicts_with = "command")]
    pub file: Option<PathBuf>,

    /// Write diagnostics as JSON to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Command whose stdout is tailed, e.g. -- ssh host -- tail -f /var/log/syslog
    #[arg(last = true)]
    pub command: Vec<String>,
}

/// Why the session ended.
#[derive(Debug)]
enum Shutdown {
    SourceEnded(IngestReport),
    SourceFailed(io::Error),
    Quit,
    InputFailed(io::Error),
    Interrupted,
}

/// Picks the line source: command-line overrides first, then the config file.
fn open_source(args: &RunArgs, configured: &SourceConfig) -> Result<Box<dyn LineSource>> {
    if !args.command.is_empty() {
        return spawn(&args.command);
    }
    if let Some(path) = args.file.as_ref().or(configured.file.as_ref()) {
        let source = ReaderSource::open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        return Ok(Box::new(source));
    }
    if !configured.command.is_empty() {
        return spawn(&configured.command);
    }
    Err(ConfigError::MissingSource.into())
}

fn spawn(argv: &[String]) -> Result<Box<dyn LineSource>> {
    let source = CommandSource::spawn(argv)
        .with_context(|| format!("failed to spawn log source '{}'", argv.join(" ")))?;
    Ok(Box::new(source))
}

/// Runs ingestion and the interactive session until one of them ends.
pub fn run(args: RunArgs) -> Result<()> {
    let location = ConfigLocation::resolve(args.config.as_deref());
    let config = load_or_default(location.as_ref()).context("failed to load configuration")?;
    let initial_state = build_runtime_state(&config).context("failed to compile configuration")?;

    let mut source = open_source(&args, &config.source)?;

    let classifier = config
        .source
        .year
        .map(Classifier::new)
        .unwrap_or_default();
    tracing::info!(year = classifier.year(), "syslog timestamps use this year");

    let color = !args.no_color && io::stdout().is_terminal();
    let presenter: Arc<dyn Presenter> = Arc::new(TerminalPresenter::new(color));
    let store = Arc::new(EventStore::new());
    let runtime = Arc::new(RuntimeHandle::new(location, initial_state));

    let (tx, rx) = mpsc::channel::<Shutdown>();

    ctrlc::set_handler({
        let tx = tx.clone();
        move || {
            let _ = tx.send(Shutdown::Interrupted);
        }
    })
    .context("failed to install Ctrl-C handler")?;

    let ingestor = Ingestor::new(
        classifier,
        store.clone(),
        runtime.clone(),
        presenter.clone(),
    );
    thread::Builder::new()
        .name("ingest".to_string())
        .spawn({
            let tx = tx.clone();
            move || {
                let reason = match ingestor.run(source.as_mut()) {
                    Ok(report) => Shutdown::SourceEnded(report),
                    Err(err) => Shutdown::SourceFailed(err),
                };
                let _ = tx.send(reason);
            }
        })
        .context("failed to spawn ingest thread")?;

    let mut session = Session::new(store.clone(), runtime, presenter.clone());
    thread::Builder::new()
        .name("repl".to_string())
        .spawn(move || {
            let reason = match session.run(io::stdin().lock()) {
                Ok(()) => Shutdown::Quit,
                Err(err) => Shutdown::InputFailed(err),
            };
            let _ = tx.send(reason);
        })
        .context("failed to spawn repl thread")?;

    let reason = rx
        .recv()
        .context("worker threads exited without reporting")?;

    match reason {
        Shutdown::SourceEnded(report) => {
            tracing::info!(lines = report.lines, events = store.len(), "log source ended");
            presenter.notice("\nlog source ended");
            Ok(())
        }
        Shutdown::SourceFailed(err) => {
            tracing::error!(error = %err, "log source failed");
            Err(err).context("failed to read from log source")
        }
        Shutdown::Quit => {
            tracing::info!(events = store.len(), "session ended");
            Ok(())
        }
        Shutdown::InputFailed(err) => Err(err).context("failed to read commands from stdin"),
        Shutdown::Interrupted => {
            tracing::info!(events = store.len(), "interrupted");
            presenter.notice("");
            Ok(())
        }
    }
}
