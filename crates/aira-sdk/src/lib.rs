//! AIRA SDK - risk assessment engine facade
//!
//! Wires the configuration store and the scoring runtime together behind an
//! [`AssessmentEngine`]: evaluations always run against one immutable
//! snapshot, while reloads (explicit or from a [`ConfigWatcher`]) publish new
//! snapshots without interrupting them.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aira_sdk::{AnswerSet, AssessmentEngineBuilder, SourceConfig};
//!
//! let engine = AssessmentEngineBuilder::new()
//!     .with_source_config(SourceConfig::file_system("config"))
//!     .build()
//!     .await?;
//!
//! let answers = AnswerSet::new()
//!     .with_scoring("autonomy", "agent")
//!     .with_annotation("autonomy_reasoning", "Plans its own tool calls");
//!
//! let result = engine.evaluate(&answers);
//! println!("{} ({:.1})", result.level, result.total_score);
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod watcher;

// Re-export main types
pub use builder::AssessmentEngineBuilder;
pub use config::{EngineConfig, DEFAULT_POLL_INTERVAL};
pub use engine::AssessmentEngine;
pub use error::{Result, SdkError};
pub use watcher::ConfigWatcher;

// Re-export commonly used types from dependencies
pub use aira_core::{
    AnswerInput, AnswerSet, AnswerTag, ConfigError, ConfigIssue, ConfigSnapshot, Diagnostic,
    Severity,
};
pub use aira_repository::{ConfigSource, FileSystemSource, MemorySource, SourceConfig, SourceKind};
pub use aira_runtime::{Classification, EvaluationResult, Recommendations};
