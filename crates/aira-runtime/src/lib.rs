//! AIRA Runtime - scoring and classification engine
//!
//! This crate evaluates answer sets against a
//! [`ConfigSnapshot`](aira_core::ConfigSnapshot): question scores are looked
//! up, aggregated per category, summed, classified into a risk level and
//! matched against recommendation rules. Everything here is synchronous and
//! free of side effects.

pub mod classifier;
pub mod error;
pub mod evaluate;
pub mod recommendation;
pub mod score;

// Re-export main types
pub use classifier::{Classification, Classifier, LevelMatch};
pub use error::{Result, RuntimeError};
pub use evaluate::{
    evaluate, evaluate_with_options, EvaluationOptions, EvaluationResult, Recommendations,
};
pub use recommendation::{rule_matches, RecommendationResolver};
pub use score::{aggregate, Aggregate, QuestionScore, ScoreEngine, ScoreSource, ScoredAnswer};
