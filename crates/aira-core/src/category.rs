//! Category and question definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Strategy combining question scores into a category score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    Sum,
    Average,
    WeightedAverage,
    /// Used when a category does not name a strategy
    #[default]
    Max,
    Min,
}

impl AggregationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationStrategy::Sum => "sum",
            AggregationStrategy::Average => "average",
            AggregationStrategy::WeightedAverage => "weighted_average",
            AggregationStrategy::Max => "max",
            AggregationStrategy::Min => "min",
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregationStrategy::Sum),
            "average" | "mean" => Ok(AggregationStrategy::Average),
            "weighted_average" => Ok(AggregationStrategy::WeightedAverage),
            "max" => Ok(AggregationStrategy::Max),
            "min" => Ok(AggregationStrategy::Min),
            other => Err(format!("unknown aggregation strategy '{}'", other)),
        }
    }
}

/// Display data for one answer option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Opaque display metadata from the question definition source
///
/// Scoring never reads this; it is carried for collaborators (forms, reports).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Options in declaration order
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// Scoring configuration of a single question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionConfig {
    /// Question identifier, unique across all categories
    pub id: String,

    /// Owning category id
    pub category: String,

    /// Weight used by [`AggregationStrategy::WeightedAverage`]
    pub weight: f64,

    /// Answer key → score
    pub scoring: BTreeMap<String, f64>,

    /// Default scale consulted first when `scoring` has no entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_scale: Option<String>,

    /// Present when the definition source exposes this question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<QuestionMetadata>,
}

impl QuestionConfig {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            weight: 1.0,
            scoring: BTreeMap::new(),
            default_scale: None,
            metadata: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_score(mut self, key: impl Into<String>, score: f64) -> Self {
        self.scoring.insert(key.into(), score);
        self
    }

    pub fn with_default_scale(mut self, scale: impl Into<String>) -> Self {
        self.default_scale = Some(scale.into());
        self
    }

    pub fn with_metadata(mut self, metadata: QuestionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Answer keys the definition source offers for this question
    ///
    /// Empty when the question has no definition.
    pub fn exposed_keys(&self) -> impl Iterator<Item = &str> {
        self.metadata
            .iter()
            .flat_map(|metadata| metadata.options.iter())
            .map(|option| option.key.as_str())
    }

    pub fn is_defined(&self) -> bool {
        self.metadata.is_some()
    }
}

/// A risk axis grouping one or more questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub strategy: AggregationStrategy,
    /// Questions in declaration order
    pub questions: Vec<QuestionConfig>,
}

impl Category {
    pub fn new(id: impl Into<String>, strategy: AggregationStrategy) -> Self {
        Self {
            id: id.into(),
            strategy,
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: QuestionConfig) -> Self {
        self.questions.push(question);
        self
    }

    pub fn question(&self, id: &str) -> Option<&QuestionConfig> {
        self.questions.iter().find(|question| question.id == id)
    }
}
