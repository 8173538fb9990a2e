mod error;
mod loader;
#[cfg(test)]
mod tests;
pub mod types;

pub use error::ConfigError;
pub use loader::{ConfigLocation, default_config_path, load_config, load_or_default};
pub use types::BclogConfig;
