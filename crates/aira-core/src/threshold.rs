//! Score → risk level threshold tables

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive score range mapped to a level label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRange {
    /// Key of the range in the source document (e.g. `low`)
    pub key: String,
    pub min: f64,
    pub max: f64,
    pub level: String,
}

impl ThresholdRange {
    pub fn new(key: impl Into<String>, min: f64, max: f64, level: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            min,
            max,
            level: level.into(),
        }
    }

    /// Inclusive on both bounds
    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score <= self.max
    }
}

/// Ordered, non-empty list of threshold ranges
///
/// Ranges keep their declaration order; the classifier scans them in that
/// order. The lowest and highest ranges are resolved once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ThresholdRange>", into = "Vec<ThresholdRange>")]
pub struct ThresholdTable {
    ranges: Vec<ThresholdRange>,
    lowest: usize,
    highest: usize,
}

impl ThresholdTable {
    pub fn new(ranges: Vec<ThresholdRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(ConfigError::NoThresholds);
        }

        for range in &ranges {
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(ConfigError::malformed(
                    "risk_thresholds",
                    format!("range '{}' has a non-finite bound", range.key),
                ));
            }
            if range.min > range.max {
                return Err(ConfigError::malformed(
                    "risk_thresholds",
                    format!(
                        "range '{}' has min {} greater than max {}",
                        range.key, range.min, range.max
                    ),
                ));
            }
        }

        // First range wins ties so the choice is stable
        let mut lowest = 0;
        let mut highest = 0;
        for (idx, range) in ranges.iter().enumerate() {
            if range.min < ranges[lowest].min {
                lowest = idx;
            }
            if range.max > ranges[highest].max {
                highest = idx;
            }
        }

        Ok(Self {
            ranges,
            lowest,
            highest,
        })
    }

    pub fn ranges(&self) -> &[ThresholdRange] {
        &self.ranges
    }

    /// Range with the smallest minimum
    pub fn lowest(&self) -> &ThresholdRange {
        &self.ranges[self.lowest]
    }

    /// Range with the largest maximum
    pub fn highest(&self) -> &ThresholdRange {
        &self.ranges[self.highest]
    }

    /// Ranges sorted by minimum, ties broken by declaration order
    pub fn sorted_by_min(&self) -> Vec<&ThresholdRange> {
        let mut sorted: Vec<&ThresholdRange> = self.ranges.iter().collect();
        sorted.sort_by(|a, b| a.min.total_cmp(&b.min));
        sorted
    }

    /// Distinct level labels in declaration order
    pub fn levels(&self) -> Vec<&str> {
        let mut levels: Vec<&str> = Vec::new();
        for range in &self.ranges {
            if !levels.contains(&range.level.as_str()) {
                levels.push(range.level.as_str());
            }
        }
        levels
    }
}

impl TryFrom<Vec<ThresholdRange>> for ThresholdTable {
    type Error = ConfigError;

    fn try_from(ranges: Vec<ThresholdRange>) -> Result<Self> {
        Self::new(ranges)
    }
}

impl From<ThresholdTable> for Vec<ThresholdRange> {
    fn from(table: ThresholdTable) -> Self {
        table.ranges
    }
}

/// Presentation attributes for a level (`risk_styling`)
///
/// Passed through untouched for report renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelStyle {
    pub attributes: BTreeMap<String, String>,
}

impl LevelStyle {
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).map(String::as_str)
    }
}
