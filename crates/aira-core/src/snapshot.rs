//! Immutable configuration snapshot
//!
//! A [`ConfigSnapshot`] bundles every definition an evaluation needs. It is
//! never mutated after construction: a reload builds a new snapshot and swaps
//! the handle, so readers holding the old one keep a consistent view.

use crate::category::{Category, QuestionConfig};
use crate::diagnostics::ConfigIssue;
use crate::recommendation::RecommendationRules;
use crate::scale::ScaleSet;
use crate::threshold::{LevelStyle, ThresholdTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::SystemTime;

/// Change-detection stamp of one source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnitStamp {
    /// File on disk
    File {
        modified: Option<SystemTime>,
        len: u64,
    },
    /// Expected file that does not exist
    Missing,
    /// In-memory document revision
    Revision { revision: u64 },
}

/// Unit name → stamp, over every source unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFingerprint {
    units: BTreeMap<String, UnitStamp>,
}

impl SourceFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: impl Into<String>, stamp: UnitStamp) {
        self.units.insert(unit.into(), stamp);
    }

    pub fn get(&self, unit: &str) -> Option<&UnitStamp> {
        self.units.get(unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units whose stamp differs, including added and removed units
    pub fn changed_units<'a>(&'a self, other: &'a SourceFingerprint) -> Vec<&'a str> {
        let mut changed: Vec<&str> = self
            .units
            .iter()
            .filter(|(unit, stamp)| other.units.get(unit.as_str()) != Some(stamp))
            .map(|(unit, _)| unit.as_str())
            .collect();
        changed.extend(
            other
                .units
                .keys()
                .filter(|unit| !self.units.contains_key(unit.as_str()))
                .map(String::as_str),
        );
        changed
    }
}

/// Parsed definitions, before they are versioned into a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDefinitions {
    /// Categories in declaration order
    pub categories: Vec<Category>,
    pub scales: ScaleSet,
    pub thresholds: ThresholdTable,
    pub recommendations: RecommendationRules,
    /// Level → presentation attributes
    pub styling: BTreeMap<String, LevelStyle>,
}

impl ConfigDefinitions {
    pub fn new(categories: Vec<Category>, thresholds: ThresholdTable) -> Self {
        Self {
            categories,
            scales: ScaleSet::default(),
            thresholds,
            recommendations: RecommendationRules::default(),
            styling: BTreeMap::new(),
        }
    }

    pub fn with_scales(mut self, scales: ScaleSet) -> Self {
        self.scales = scales;
        self
    }

    pub fn with_recommendations(mut self, recommendations: RecommendationRules) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_styling(mut self, styling: BTreeMap<String, LevelStyle>) -> Self {
        self.styling = styling;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSnapshot {
    version: u64,
    loaded_at: DateTime<Utc>,
    fingerprint: SourceFingerprint,
    #[serde(flatten)]
    definitions: ConfigDefinitions,
    issues: Vec<ConfigIssue>,
    /// question id → (category index, question index)
    #[serde(skip)]
    question_index: HashMap<String, (usize, usize)>,
}

impl ConfigSnapshot {
    pub fn new(
        version: u64,
        fingerprint: SourceFingerprint,
        definitions: ConfigDefinitions,
        issues: Vec<ConfigIssue>,
    ) -> Self {
        let mut question_index = HashMap::new();
        for (c_idx, category) in definitions.categories.iter().enumerate() {
            for (q_idx, question) in category.questions.iter().enumerate() {
                question_index
                    .entry(question.id.clone())
                    .or_insert((c_idx, q_idx));
            }
        }

        Self {
            version,
            loaded_at: Utc::now(),
            fingerprint,
            definitions,
            issues,
            question_index,
        }
    }

    /// Monotonic version assigned by the store that built this snapshot
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn fingerprint(&self) -> &SourceFingerprint {
        &self.fingerprint
    }

    pub fn definitions(&self) -> &ConfigDefinitions {
        &self.definitions
    }

    pub fn categories(&self) -> &[Category] {
        &self.definitions.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.definitions
            .categories
            .iter()
            .find(|category| category.id == id)
    }

    /// Look up a question and its owning category
    pub fn question(&self, id: &str) -> Option<(&Category, &QuestionConfig)> {
        let (c_idx, q_idx) = *self.question_index.get(id)?;
        let category = &self.definitions.categories[c_idx];
        Some((category, &category.questions[q_idx]))
    }

    pub fn question_count(&self) -> usize {
        self.question_index.len()
    }

    pub fn scales(&self) -> &ScaleSet {
        &self.definitions.scales
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.definitions.thresholds
    }

    pub fn recommendations(&self) -> &RecommendationRules {
        &self.definitions.recommendations
    }

    pub fn style_for(&self, level: &str) -> Option<&LevelStyle> {
        self.definitions.styling.get(level)
    }

    /// Non-fatal issues found while loading
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::AggregationStrategy;
    use crate::threshold::ThresholdRange;

    fn definitions() -> ConfigDefinitions {
        let autonomy = Category::new("autonomy", AggregationStrategy::WeightedAverage)
            .with_question(QuestionConfig::new("autonomy", "autonomy").with_score("tool", 1.0))
            .with_question(
                QuestionConfig::new("autonomy_scope", "autonomy").with_score("narrow", 1.0),
            );
        let oversight = Category::new("oversight", AggregationStrategy::Max)
            .with_question(QuestionConfig::new("oversight", "oversight").with_score("full", 1.0));
        let thresholds =
            ThresholdTable::new(vec![ThresholdRange::new("low", 0.0, 10.0, "low")]).unwrap();
        ConfigDefinitions::new(vec![autonomy, oversight], thresholds)
    }

    #[test]
    fn test_question_index() {
        let snapshot = ConfigSnapshot::new(1, SourceFingerprint::new(), definitions(), vec![]);

        let (category, question) = snapshot.question("autonomy_scope").unwrap();
        assert_eq!(category.id, "autonomy");
        assert_eq!(question.id, "autonomy_scope");
        assert!(snapshot.question("unknown").is_none());
        assert_eq!(snapshot.question_count(), 3);
    }

    #[test]
    fn test_fingerprint_changes() {
        let mut before = SourceFingerprint::new();
        before.insert("scoring", UnitStamp::Revision { revision: 1 });
        before.insert("questions/autonomy.yaml", UnitStamp::Revision { revision: 1 });

        let mut after = before.clone();
        assert!(before.changed_units(&after).is_empty());

        after.insert("scoring", UnitStamp::Revision { revision: 2 });
        after.insert("questions/impact.yaml", UnitStamp::Missing);
        let mut changed = after.changed_units(&before);
        changed.sort();
        assert_eq!(changed, vec!["questions/impact.yaml", "scoring"]);
    }
}
