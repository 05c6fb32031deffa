//! Score to risk level classification
//!
//! The total is rounded half-to-even, then matched against the threshold
//! ranges in declaration order; the first inclusive match wins. Scores
//! outside the table clamp to its lowest or highest level, and a score that
//! lands in a gap between two ranges resolves to the range below it.

use aira_core::{ClampDirection, Diagnostic, ThresholdRange, ThresholdTable};
use serde::{Deserialize, Serialize};

/// How a level was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    InRange,
    ClampedBelow,
    ClampedAbove,
    Gap,
}

/// Outcome of classifying one score
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMatch<'a> {
    pub range: &'a ThresholdRange,
    /// Score the ranges were compared against
    pub rounded: f64,
    pub classification: Classification,
}

impl LevelMatch<'_> {
    pub fn level(&self) -> &str {
        &self.range.level
    }

    /// Diagnostic for clamps and gaps
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        let level = self.range.level.clone();
        match self.classification {
            Classification::InRange => None,
            Classification::ClampedBelow => Some(Diagnostic::ClassificationClamped {
                score: self.rounded,
                level,
                direction: ClampDirection::BelowLowest,
            }),
            Classification::ClampedAbove => Some(Diagnostic::ClassificationClamped {
                score: self.rounded,
                level,
                direction: ClampDirection::AboveHighest,
            }),
            Classification::Gap => Some(Diagnostic::ClassificationGap {
                score: self.rounded,
                level,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    thresholds: &'a ThresholdTable,
}

impl<'a> Classifier<'a> {
    pub fn new(thresholds: &'a ThresholdTable) -> Self {
        Self { thresholds }
    }

    /// Classify a total score
    pub fn classify(&self, total: f64) -> LevelMatch<'a> {
        let rounded = total.round_ties_even();
        let ranges = self.thresholds.ranges();

        if let Some(range) = ranges.iter().find(|range| range.contains(rounded)) {
            return LevelMatch {
                range,
                rounded,
                classification: Classification::InRange,
            };
        }

        let lowest = self.thresholds.lowest();
        if rounded < lowest.min {
            return LevelMatch {
                range: lowest,
                rounded,
                classification: Classification::ClampedBelow,
            };
        }

        let highest = self.thresholds.highest();
        if rounded > highest.max {
            return LevelMatch {
                range: highest,
                rounded,
                classification: Classification::ClampedAbove,
            };
        }

        // Inside the table but between ranges: take the closest range below
        let below = ranges
            .iter()
            .filter(|range| range.max < rounded)
            .fold(None::<&ThresholdRange>, |best, range| match best {
                Some(best) if best.max >= range.max => Some(best),
                _ => Some(range),
            })
            .unwrap_or(lowest);

        LevelMatch {
            range: below,
            rounded,
            classification: Classification::Gap,
        }
    }
}
