use crate::duration::{DurationError, parse_duration};
use crate::store::CategoryFilter;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SUMMARY_WINDOW: Duration = Duration::from_secs(24 * 3_600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryWindow {
    /// 24 hours.
    Default,
    Last(Duration),
    /// Wall-clock time since the previous prompt.
    SinceLastPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show {
        filter: CategoryFilter,
        window: Duration,
    },
    Summary(SummaryWindow),
    Detail(usize),
    Reload,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("show requires two arguments: show <category|*> <duration>")]
    ShowUsage,

    #[error("summary takes at most one argument: summary [duration|last-prompt]")]
    SummaryUsage,

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  show <category|*> <duration>     replay events, e.g. 'show * 10m', 'show nginx-access-500 1h'
  summary [duration|last-prompt]   per-category counts (default 24h); empty input = summary last-prompt
  <index>                          full detail for one event
  reload                           re-read configuration
  clear                            clear the screen
  help                             this text
  quit                             exit
";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = input.split_whitespace().collect();

        let Some((&head, args)) = words.split_first() else {
            return Ok(Command::Summary(SummaryWindow::SinceLastPrompt));
        };

        match head {
            "show" => {
                let [category, window] = args else {
                    return Err(CommandError::ShowUsage);
                };
                Ok(Command::Show {
                    filter: CategoryFilter::from(*category),
                    window: parse_duration(window)?,
                })
            }
            "summary" => match args {
                [] => Ok(Command::Summary(SummaryWindow::Default)),
                ["last-prompt"] => Ok(Command::Summary(SummaryWindow::SinceLastPrompt)),
                [window] => Ok(Command::Summary(SummaryWindow::Last(parse_duration(window)?))),
                _ => Err(CommandError::SummaryUsage),
            },
            "reload" => Ok(Command::Reload),
            "clear" => Ok(Command::Clear),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => match (other.parse::<usize>(), args) {
                (Ok(index), []) => Ok(Command::Detail(index)),
                _ => Err(CommandError::Unknown(input.trim().to_string())),
            },
        }
    }
}
