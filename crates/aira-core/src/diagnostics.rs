//! Evaluation diagnostics and configuration issues
//!
//! [`Diagnostic`]s are produced while evaluating one answer set and are
//! returned alongside the result. [`ConfigIssue`]s describe the configuration
//! itself and are consumed by administrative tooling.

use crate::category::AggregationStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of an evaluation diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Trace detail, only collected when tracing is requested
    Info,
    /// Always collected
    Warning,
}

/// Why an aggregation fell back to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateReason {
    NoScoringEntries,
    ZeroTotalWeight,
}

/// Which end of the threshold table a score was clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampDirection {
    BelowLowest,
    AboveHighest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No score for the answer in the question map or any default scale
    MissingScore {
        category: String,
        question: String,
        answer: String,
    },

    /// Score came from a default scale
    DefaultScaleUsed {
        category: String,
        question: String,
        answer: String,
        scale: String,
    },

    /// Aggregation had nothing to combine and resolved to zero
    DegenerateAggregation {
        category: String,
        strategy: AggregationStrategy,
        reason: DegenerateReason,
    },

    /// Score outside the table, clamped to its lowest or highest level
    ClassificationClamped {
        score: f64,
        level: String,
        direction: ClampDirection,
    },

    /// Score between two ranges, resolved to the range below
    ClassificationGap { score: f64, level: String },

    /// Answer for a question id no category declares
    IgnoredAnswer { question: String },
}

impl Diagnostic {
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            Diagnostic::MissingScore { .. }
            | Diagnostic::ClassificationClamped { .. }
            | Diagnostic::ClassificationGap { .. } => DiagnosticLevel::Warning,
            Diagnostic::DegenerateAggregation { reason, .. } => match reason {
                DegenerateReason::ZeroTotalWeight => DiagnosticLevel::Warning,
                DegenerateReason::NoScoringEntries => DiagnosticLevel::Info,
            },
            Diagnostic::DefaultScaleUsed { .. } | Diagnostic::IgnoredAnswer { .. } => {
                DiagnosticLevel::Info
            }
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level() == DiagnosticLevel::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingScore {
                category,
                question,
                answer,
            } => write!(
                f,
                "no score for {}.{} answer '{}', scored as 0",
                category, question, answer
            ),
            Diagnostic::DefaultScaleUsed {
                category,
                question,
                answer,
                scale,
            } => write!(
                f,
                "{}.{} answer '{}' scored from default scale '{}'",
                category, question, answer, scale
            ),
            Diagnostic::DegenerateAggregation {
                category,
                strategy,
                reason,
            } => {
                let why = match reason {
                    DegenerateReason::NoScoringEntries => "no scoring answers",
                    DegenerateReason::ZeroTotalWeight => "total weight is zero",
                };
                write!(f, "{} ({}) resolved to 0: {}", category, strategy, why)
            }
            Diagnostic::ClassificationClamped {
                score,
                level,
                direction,
            } => {
                let side = match direction {
                    ClampDirection::BelowLowest => "below the lowest",
                    ClampDirection::AboveHighest => "above the highest",
                };
                write!(f, "score {} is {} threshold, clamped to '{}'", score, side, level)
            }
            Diagnostic::ClassificationGap { score, level } => write!(
                f,
                "score {} falls between threshold ranges, resolved to '{}'",
                score, level
            ),
            Diagnostic::IgnoredAnswer { question } => {
                write!(f, "answer for unknown question '{}' ignored", question)
            }
        }
    }
}

/// Severity of a configuration issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    /// The configuration cannot be loaded while this issue exists
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigIssue {
    /// Exposed answer key with no score and no reachable default scale
    MissingScore {
        category: String,
        question: String,
        key: String,
    },

    /// Scoring entry for a question the definition source does not expose
    OrphanedScoring { category: String, question: String },

    /// Defined question without a scoring entry
    UnscoredQuestion { category: String, question: String },

    /// Question file for a category the scoring source does not declare
    UndeclaredCategory { category: String },

    /// Category without any question
    EmptyCategory { category: String },

    ThresholdOverlap {
        first: String,
        second: String,
    },

    ThresholdGap {
        below: String,
        above: String,
        from: f64,
        to: f64,
    },

    /// Baseline recommendations for a level no threshold produces
    UnknownRecommendationLevel { level: String },

    /// Threshold level without baseline recommendations
    MissingRecommendations { level: String },

    /// Condition field that no question exposes, so the rule can never match
    UnknownConditionField { rule: usize, field: String },

    /// Conditional rule without clauses, matching every answer set
    UnconditionalRule { rule: usize },

    /// The configuration cannot be parsed at all
    Malformed { message: String },
}

impl ConfigIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ConfigIssue::MissingScore { .. } | ConfigIssue::Malformed { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::MissingScore {
                category,
                question,
                key,
            } => write!(f, "{}/{}: option '{}' has no score", category, question, key),
            ConfigIssue::OrphanedScoring { category, question } => write!(
                f,
                "{}/{}: scoring entry for a question that is not defined",
                category, question
            ),
            ConfigIssue::UnscoredQuestion { category, question } => {
                write!(f, "{}/{}: no scoring configuration", category, question)
            }
            ConfigIssue::UndeclaredCategory { category } => write!(
                f,
                "{}: questions defined but no scoring dimension declared",
                category
            ),
            ConfigIssue::EmptyCategory { category } => {
                write!(f, "{}: category has no questions", category)
            }
            ConfigIssue::ThresholdOverlap { first, second } => {
                write!(f, "thresholds '{}' and '{}' overlap", first, second)
            }
            ConfigIssue::ThresholdGap {
                below,
                above,
                from,
                to,
            } => write!(
                f,
                "gap between thresholds '{}' and '{}' ({} to {})",
                below, above, from, to
            ),
            ConfigIssue::UnknownRecommendationLevel { level } => write!(
                f,
                "recommendations for level '{}' which no threshold produces",
                level
            ),
            ConfigIssue::MissingRecommendations { level } => {
                write!(f, "level '{}' has no baseline recommendations", level)
            }
            ConfigIssue::UnknownConditionField { rule, field } => write!(
                f,
                "conditional rule #{} references unknown field '{}'",
                rule, field
            ),
            ConfigIssue::UnconditionalRule { rule } => {
                write!(f, "conditional rule #{} has an empty condition", rule)
            }
            ConfigIssue::Malformed { message } => write!(f, "{}", message),
        }
    }
}
