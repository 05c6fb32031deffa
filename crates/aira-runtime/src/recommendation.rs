//! Recommendation resolution

use aira_core::{AnswerSet, ConditionalRule, RecommendationRules};

/// Resolves baseline and conditional recommendations
#[derive(Debug, Clone, Copy)]
pub struct RecommendationResolver<'a> {
    rules: &'a RecommendationRules,
}

impl<'a> RecommendationResolver<'a> {
    pub fn new(rules: &'a RecommendationRules) -> Self {
        Self { rules }
    }

    /// Baseline recommendations for `level`; empty for unknown levels
    pub fn baseline(&self, level: &str) -> &'a [String] {
        self.rules
            .baseline
            .get(level)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Recommendations of every matching rule, in declaration order
    ///
    /// Duplicates across rules are kept.
    pub fn conditional(&self, answers: &AnswerSet) -> Vec<&'a str> {
        self.rules
            .conditional
            .iter()
            .filter(|rule| rule_matches(rule, answers))
            .map(|rule| rule.recommendation.as_str())
            .collect()
    }
}

/// A rule matches when every clause's field was answered with an allowed value
///
/// An unanswered field never matches. An empty condition matches everything.
pub fn rule_matches(rule: &ConditionalRule, answers: &AnswerSet) -> bool {
    rule.condition.iter().all(|clause| {
        answers
            .value(&clause.field)
            .map_or(false, |value| clause.allowed.contains(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RecommendationRules {
        RecommendationRules::new()
            .with_baseline("high", ["Run an impact review", "Add checkpoints"])
            .with_rule(
                ConditionalRule::new("Notify affected parties")
                    .when("impact", ["external"])
                    .when("oversight", ["minimal"]),
            )
            .with_rule(ConditionalRule::new("Log decisions").when("autonomy", ["agent", "autonomous"]))
            .with_rule(ConditionalRule::new("Notify affected parties").when("impact", ["external"]))
    }

    #[test]
    fn test_baseline_lookup() {
        let rules = rules();
        let resolver = RecommendationResolver::new(&rules);

        assert_eq!(resolver.baseline("high").len(), 2);
        assert!(resolver.baseline("unknown").is_empty());
    }

    #[test]
    fn test_all_clauses_must_match() {
        let rules = rules();
        let resolver = RecommendationResolver::new(&rules);

        let both = AnswerSet::new()
            .with_scoring("impact", "external")
            .with_scoring("oversight", "minimal");
        assert_eq!(
            resolver.conditional(&both),
            vec!["Notify affected parties", "Notify affected parties"]
        );

        let partial = AnswerSet::new()
            .with_scoring("impact", "external")
            .with_scoring("oversight", "checkpoint");
        assert_eq!(resolver.conditional(&partial), vec!["Notify affected parties"]);
    }

    #[test]
    fn test_missing_field_is_no_match() {
        let rules = rules();
        let resolver = RecommendationResolver::new(&rules);

        let answers = AnswerSet::new().with_scoring("oversight", "minimal");
        assert!(resolver.conditional(&answers).is_empty());
    }

    #[test]
    fn test_any_allowed_value_matches() {
        let rules = rules();
        let resolver = RecommendationResolver::new(&rules);

        let answers = AnswerSet::new().with_scoring("autonomy", "autonomous");
        assert_eq!(resolver.conditional(&answers), vec!["Log decisions"]);
    }

    #[test]
    fn test_empty_condition_matches_everything() {
        let rule = ConditionalRule::new("Always review");
        assert!(rule_matches(&rule, &AnswerSet::new()));
    }
}
