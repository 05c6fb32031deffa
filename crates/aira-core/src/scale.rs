//! Shared default scales
//!
//! A default scale is a named answer-key → score map that questions fall back
//! to when their own scoring map has no entry. The [`ScaleSet`] keeps scales
//! in resolution order, so the load-time validator and the score engine agree
//! on which score an answer resolves to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultScale {
    pub name: String,
    pub scores: BTreeMap<String, f64>,
}

impl DefaultScale {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, key: impl Into<String>, score: f64) -> Self {
        self.scores.insert(key.into(), score);
        self
    }
}

/// Result of a scale lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMatch<'a> {
    pub scale: &'a str,
    pub score: f64,
}

/// Default scales in resolution order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleSet {
    scales: Vec<DefaultScale>,
}

impl ScaleSet {
    /// Order `scales` by `priority`
    ///
    /// Scales named in `priority` come first, in that order; the rest follow in
    /// declaration order. Unknown priority names are skipped.
    pub fn new(scales: Vec<DefaultScale>, priority: &[String]) -> Self {
        let mut remaining = scales;
        let mut ordered = Vec::with_capacity(remaining.len());

        for name in priority {
            if let Some(pos) = remaining.iter().position(|scale| &scale.name == name) {
                ordered.push(remaining.remove(pos));
            }
        }
        ordered.extend(remaining);

        Self { scales: ordered }
    }

    pub fn get(&self, name: &str) -> Option<&DefaultScale> {
        self.scales.iter().find(|scale| scale.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefaultScale> {
        self.scales.iter()
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Resolve `key` through the scales
    ///
    /// `preferred` (a question's own scale reference) is tried first, then every
    /// scale in resolution order.
    pub fn lookup(&self, preferred: Option<&str>, key: &str) -> Option<ScaleMatch<'_>> {
        let preferred_scale = preferred.and_then(|name| self.get(name));

        preferred_scale
            .into_iter()
            .chain(self.scales.iter())
            .find_map(|scale| {
                scale.scores.get(key).map(|score| ScaleMatch {
                    scale: scale.name.as_str(),
                    score: *score,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scales() -> Vec<DefaultScale> {
        vec![
            DefaultScale::new("frequency")
                .with_score("rarely", 1.0)
                .with_score("often", 3.0),
            DefaultScale::new("likert")
                .with_score("often", 2.0)
                .with_score("always", 4.0),
        ]
    }

    #[test]
    fn test_declaration_order_without_priority() {
        let set = ScaleSet::new(scales(), &[]);
        let hit = set.lookup(None, "often").unwrap();
        assert_eq!(hit.scale, "frequency");
        assert_eq!(hit.score, 3.0);
    }

    #[test]
    fn test_priority_reorders() {
        let set = ScaleSet::new(scales(), &["likert".to_string(), "missing".to_string()]);
        let names: Vec<_> = set.iter().map(|scale| scale.name.as_str()).collect();
        assert_eq!(names, vec!["likert", "frequency"]);
        assert_eq!(set.lookup(None, "often").unwrap().score, 2.0);
    }

    #[test]
    fn test_preferred_scale_first() {
        let set = ScaleSet::new(scales(), &[]);
        let hit = set.lookup(Some("likert"), "often").unwrap();
        assert_eq!(hit.scale, "likert");

        // Keys missing from the preferred scale still fall through
        let hit = set.lookup(Some("likert"), "rarely").unwrap();
        assert_eq!(hit.scale, "frequency");
    }

    #[test]
    fn test_total_miss() {
        let set = ScaleSet::new(scales(), &[]);
        assert!(set.lookup(Some("likert"), "never").is_none());
    }
}
