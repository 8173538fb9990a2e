use super::command::{Command, DEFAULT_SUMMARY_WINDOW, HELP, SummaryWindow};
use crate::present::Presenter;
use crate::runtime::RuntimeHandle;
use crate::store::EventStore;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Executes commands against the store.
pub struct Session {
    store: Arc<EventStore>,
    runtime: Arc<RuntimeHandle>,
    presenter: Arc<dyn Presenter>,
    last_prompt: Instant,
}

impl Session {
    pub fn new(
        store: Arc<EventStore>,
        runtime: Arc<RuntimeHandle>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            store,
            runtime,
            presenter,
            last_prompt: Instant::now(),
        }
    }

    /// Parses and runs one line of input. Errors are shown, never returned.
    pub fn execute_line(&mut self, line: &str) -> Flow {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                self.presenter.error(&err.to_string());
                Flow::Continue
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Flow {
        tracing::debug!(?command, "executing command");

        match command {
            Command::Show { filter, window } => {
                let events = self.store.show(&filter, window);
                self.presenter.show(&events);
            }
            Command::Summary(window) => {
                let window = match window {
                    SummaryWindow::Default => DEFAULT_SUMMARY_WINDOW,
                    SummaryWindow::Last(window) => window,
                    SummaryWindow::SinceLastPrompt => self.last_prompt.elapsed(),
                };
                let rows = self.store.summary(window);
                self.presenter.summary(window, &rows);
            }
            Command::Detail(index) => match self.store.detail(index) {
                Ok(event) => self.presenter.detail(index, &event),
                Err(err) => self.presenter.error(&err.to_string()),
            },
            Command::Reload => match self.runtime.reload() {
                Ok(epoch) => self
                    .presenter
                    .notice(&format!("configuration reloaded (epoch {epoch})")),
                Err(err) => self
                    .presenter
                    .error(&format!("{err}; keeping previous configuration")),
            },
            Command::Clear => self.presenter.clear(),
            Command::Help => self.presenter.notice(HELP),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    /// Shows a prompt and records when, for `summary last-prompt`.
    pub fn prompt(&mut self) {
        self.last_prompt = Instant::now();
        self.presenter.prompt();
    }

    /// Reads commands until `quit` or end of input.
    ///
    /// Only I/O failures end the loop; undecodable bytes are replaced and
    /// the line is handled like any other input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut buf = Vec::new();

        loop {
            self.prompt();

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                tracing::info!("end of input");
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buf);
            if self.execute_line(&line) == Flow::Quit {
                tracing::info!("quit requested");
                return Ok(());
            }
        }
    }
}
