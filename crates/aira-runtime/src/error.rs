//! Runtime error types

use thiserror::Error;

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Category not present in the snapshot
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Question not configured for the category
    #[error("Unknown question: {category}.{question}")]
    UnknownQuestion { category: String, question: String },
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
