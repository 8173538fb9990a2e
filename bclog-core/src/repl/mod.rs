//! The interactive command loop.

mod command;
mod session;

pub use command::{Command, CommandError, DEFAULT_SUMMARY_WINDOW, SummaryWindow};
pub use session::{Flow, Session};
