//! Configuration diagnostics
//!
//! Checks run over parsed definitions. Only [`ConfigIssue::MissingScore`]
//! stops a load; everything else is reported and the snapshot is served.

use aira_core::{ConfigDefinitions, ConfigIssue, ThresholdTable};
use std::collections::HashSet;

/// Collect every issue in the definitions, in a stable order
pub fn collect_issues(definitions: &ConfigDefinitions) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    issues.extend(scoring_issues(definitions));
    issues.extend(threshold_issues(&definitions.thresholds));
    issues.extend(recommendation_issues(definitions));
    issues
}

/// Missing scores, orphaned scoring entries, unscored questions and empty categories
pub fn scoring_issues(definitions: &ConfigDefinitions) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    for category in &definitions.categories {
        if category.questions.is_empty() {
            issues.push(ConfigIssue::EmptyCategory {
                category: category.id.clone(),
            });
            continue;
        }

        for question in &category.questions {
            if !question.is_defined() {
                issues.push(ConfigIssue::OrphanedScoring {
                    category: category.id.clone(),
                    question: question.id.clone(),
                });
                continue;
            }

            if question.scoring.is_empty() && question.default_scale.is_none() {
                issues.push(ConfigIssue::UnscoredQuestion {
                    category: category.id.clone(),
                    question: question.id.clone(),
                });
            }

            for key in question.exposed_keys() {
                if question.scoring.contains_key(key) {
                    continue;
                }
                let reachable = definitions
                    .scales
                    .lookup(question.default_scale.as_deref(), key)
                    .is_some();
                if !reachable {
                    issues.push(ConfigIssue::MissingScore {
                        category: category.id.clone(),
                        question: question.id.clone(),
                        key: key.to_string(),
                    });
                }
            }
        }
    }

    issues
}

/// Overlaps and gaps between threshold ranges
///
/// Classification compares rounded scores, so two ranges are contiguous when
/// no integer lies strictly between them (`4–7` and `8–11` leave no gap).
pub fn threshold_issues(thresholds: &ThresholdTable) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let sorted = thresholds.sorted_by_min();

    let Some((first, rest)) = sorted.split_first() else {
        return issues;
    };

    // Range reaching furthest so far
    let mut reach = *first;
    for range in rest {
        if range.min <= reach.max {
            issues.push(ConfigIssue::ThresholdOverlap {
                first: reach.key.clone(),
                second: range.key.clone(),
            });
        } else if reach.max.floor() + 1.0 < range.min {
            issues.push(ConfigIssue::ThresholdGap {
                below: reach.key.clone(),
                above: range.key.clone(),
                from: reach.max,
                to: range.min,
            });
        }

        if range.max > reach.max {
            reach = *range;
        }
    }

    issues
}

/// Baseline levels against threshold levels, and conditional rule fields
pub fn recommendation_issues(definitions: &ConfigDefinitions) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let rules = &definitions.recommendations;
    let levels = definitions.thresholds.levels();

    for level in rules.baseline.keys() {
        if !levels.contains(&level.as_str()) {
            issues.push(ConfigIssue::UnknownRecommendationLevel {
                level: level.clone(),
            });
        }
    }

    for level in &levels {
        if !rules.baseline.contains_key(*level) {
            issues.push(ConfigIssue::MissingRecommendations {
                level: level.to_string(),
            });
        }
    }

    let known_fields: HashSet<&str> = definitions
        .categories
        .iter()
        .flat_map(|category| category.questions.iter())
        .map(|question| question.id.as_str())
        .collect();

    for (index, rule) in rules.conditional.iter().enumerate() {
        if rule.condition.is_empty() {
            issues.push(ConfigIssue::UnconditionalRule { rule: index });
            continue;
        }
        for clause in &rule.condition {
            if !known_fields.contains(clause.field.as_str()) {
                issues.push(ConfigIssue::UnknownConditionField {
                    rule: index,
                    field: clause.field.clone(),
                });
            }
        }
    }

    issues
}
