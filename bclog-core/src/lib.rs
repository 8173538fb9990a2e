pub mod classify;
pub mod cli;
pub mod conf;
pub mod correlate;
pub mod duration;
pub mod event;
pub mod ingest;
pub mod logging;
pub mod present;
pub mod render;
pub mod repl;
pub mod runtime;
pub mod store;
pub mod suppress;
