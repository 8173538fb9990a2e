use crate::harness::presenter::{CapturingPresenter, Output};
use bclog_core::classify::Classifier;
use bclog_core::conf::{BclogConfig, ConfigLocation, load_config};
use bclog_core::ingest::{IngestReport, Ingestor, LineOutcome, ReaderSource};
use bclog_core::present::Presenter;
use bclog_core::repl::{Flow, Session};
use bclog_core::runtime::{RuntimeHandle, build_runtime_state};
use bclog_core::store::EventStore;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Year stamped on fixture syslog lines.
pub const FIXTURE_YEAR: i32 = 2024;

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(relative)
}

/// Ingestion and a command session wired to one store, with captured output.
pub struct TestSession {
    pub store: Arc<EventStore>,
    pub runtime: Arc<RuntimeHandle>,
    pub presenter: Arc<CapturingPresenter>,
    ingestor: Ingestor,
    session: Session,
}

impl TestSession {
    pub fn new(config: &BclogConfig) -> Self {
        Self::build(config, None)
    }

    /// Loads `path` and keeps it as the reload location.
    pub fn from_config_file(path: &Path) -> Self {
        let config = load_config(path).expect("fixture config should load");
        let location = ConfigLocation {
            path: path.to_path_buf(),
            required: true,
        };
        Self::build(&config, Some(location))
    }

    fn build(config: &BclogConfig, location: Option<ConfigLocation>) -> Self {
        let state = build_runtime_state(config).expect("fixture config should compile");

        let store = Arc::new(EventStore::new());
        let runtime = Arc::new(RuntimeHandle::new(location, state));
        let presenter = Arc::new(CapturingPresenter::default());
        let shared: Arc<dyn Presenter> = presenter.clone();

        let ingestor = Ingestor::new(
            Classifier::new(FIXTURE_YEAR),
            store.clone(),
            runtime.clone(),
            shared.clone(),
        );
        let session = Session::new(store.clone(), runtime.clone(), shared);

        Self {
            store,
            runtime,
            presenter,
            ingestor,
            session,
        }
    }

    pub fn feed(&self, lines: &[&str]) -> Vec<LineOutcome> {
        lines
            .iter()
            .map(|line| self.ingestor.ingest_line(line))
            .collect()
    }

    /// Runs the full ingest loop over a fixture log.
    pub fn feed_fixture(&self, relative: &str) -> IngestReport {
        let mut source = ReaderSource::open(&fixture_path(relative)).expect("fixture log exists");
        self.ingestor
            .run(&mut source)
            .expect("reading a fixture cannot fail")
    }

    /// Runs the whole command loop over `input`, as if typed at the prompt.
    pub fn type_lines(&mut self, input: impl AsRef<[u8]>) {
        self.session
            .run(Cursor::new(input.as_ref().to_vec()))
            .expect("reading from memory cannot fail");
    }

    /// Executes one command and returns what it presented.
    pub fn command(&mut self, line: &str) -> (Flow, Vec<Output>) {
        self.presenter.take();
        let flow = self.session.execute_line(line);
        (flow, self.presenter.take())
    }
}
