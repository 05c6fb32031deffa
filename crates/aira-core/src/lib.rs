//! AIRA Core - Core types and definitions for the AIRA risk scoring engine
//!
//! This crate provides the fundamental types used across the AIRA workspace:
//! - Category and question definitions with their scoring maps
//! - Shared default scales
//! - Threshold tables and recommendation rules
//! - Answer sets submitted for evaluation
//! - The immutable configuration snapshot
//! - Diagnostics, configuration issues and error types

pub mod answer;
pub mod category;
pub mod diagnostics;
pub mod error;
pub mod recommendation;
pub mod scale;
pub mod snapshot;
pub mod threshold;

// Re-export commonly used types
pub use answer::{AnswerEntry, AnswerInput, AnswerSet, AnswerTag, LEGACY_ANNOTATION_SUFFIX};
pub use category::{AggregationStrategy, AnswerOption, Category, QuestionConfig, QuestionMetadata};
pub use diagnostics::{
    ClampDirection, ConfigIssue, DegenerateReason, Diagnostic, DiagnosticLevel, Severity,
};
pub use error::{ConfigError, Result};
pub use recommendation::{ConditionClause, ConditionalRule, RecommendationRules};
pub use scale::{DefaultScale, ScaleMatch, ScaleSet};
pub use snapshot::{ConfigDefinitions, ConfigSnapshot, SourceFingerprint, UnitStamp};
pub use threshold::{LevelStyle, ThresholdRange, ThresholdTable};
