//! SDK error types

use aira_core::ConfigError;
use aira_repository::RepositoryError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Loading or reloading the configuration failed
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration rejected by the loader
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Builder finished without a configuration source
    #[error("No configuration source configured")]
    NotConfigured,

    /// Invalid engine settings
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

impl SdkError {
    /// The configuration error behind this error, if any
    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            SdkError::Config(err) => Some(err),
            SdkError::Repository(err) => err.config_error(),
            _ => None,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
