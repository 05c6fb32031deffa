//! Error types for AIRA Core

use std::time::Duration;
use thiserror::Error;

/// Configuration error
///
/// Raised while turning configuration documents into a snapshot. Fatal when
/// the first snapshot is built; on reload the previous snapshot stays active.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An answer key exposed by a question resolves to no score
    #[error("Missing score: {category}.{question} has no score for answer '{key}'")]
    MissingScore {
        category: String,
        question: String,
        key: String,
    },

    /// A document has an unexpected shape or value
    #[error("Malformed {document}: {message}")]
    Malformed { document: String, message: String },

    /// The threshold table is empty
    #[error("No risk thresholds configured")]
    NoThresholds,

    /// The configuration source could not be read
    #[error("Configuration source error: {0}")]
    Source(String),

    /// Loading did not finish within the configured bound
    #[error("Configuration load timed out after {0:?}")]
    Timeout(Duration),
}

impl ConfigError {
    /// Shorthand for a [`ConfigError::Malformed`] error
    pub fn malformed(document: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Malformed {
            document: document.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
