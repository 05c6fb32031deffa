//! Recommendation rules
//!
//! Baseline recommendations are keyed by risk level. Conditional rules attach
//! a recommendation to a combination of answers: every clause of the
//! condition names a field and the set of answers that satisfy it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One `field: [allowed, ...]` clause of a condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionClause {
    pub field: String,
    pub allowed: BTreeSet<String>,
}

impl ConditionClause {
    pub fn new<I, S>(field: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalRule {
    /// Clauses in declaration order; all must hold
    pub condition: Vec<ConditionClause>,
    pub recommendation: String,
}

impl ConditionalRule {
    pub fn new(recommendation: impl Into<String>) -> Self {
        Self {
            condition: Vec::new(),
            recommendation: recommendation.into(),
        }
    }

    pub fn when<I, S>(mut self, field: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.condition.push(ConditionClause::new(field, allowed));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRules {
    /// Level → recommendations in declaration order
    pub baseline: BTreeMap<String, Vec<String>>,

    /// Conditional rules in declaration order
    pub conditional: Vec<ConditionalRule>,
}

impl RecommendationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline<I, S>(mut self, level: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.baseline
            .insert(level.into(), items.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_rule(mut self, rule: ConditionalRule) -> Self {
        self.conditional.push(rule);
        self
    }
}
