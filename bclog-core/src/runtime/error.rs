use crate::conf::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
}
