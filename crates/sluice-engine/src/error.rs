use crate::host::HostError;
use sluice_config::ConfigError;
use sluice_content::TreeError;

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("host error: {0}")]
    Host(#[from] HostError),
}
