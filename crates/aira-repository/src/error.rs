//! Error types for the repository layer

use aira_core::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur while reading or loading configuration
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A required document was not found
    #[error("Document not found: {path}")]
    NotFound { path: String },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Source configuration is incomplete
    #[error("Invalid source configuration: {0}")]
    InvalidSource(String),

    /// Documents were read but do not form a valid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error
    #[error("Repository error: {0}")]
    Other(String),
}

impl RepositoryError {
    /// The underlying configuration error, if this is one
    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            RepositoryError::Config(err) => Some(err),
            _ => None,
        }
    }
}
