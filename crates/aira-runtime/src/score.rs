//! Question scoring and category aggregation

use aira_core::{
    AggregationStrategy, AnswerTag, Category, ConfigSnapshot, DegenerateReason, Diagnostic,
    QuestionConfig,
};
use serde::Serialize;

use crate::error::{Result, RuntimeError};

/// Where a question score came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "scale", rename_all = "snake_case")]
pub enum ScoreSource {
    /// The question's own scoring map
    Question,
    /// A named default scale
    Scale(String),
    /// Nothing matched; scored as 0
    Missing,
}

/// Score of one answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionScore {
    pub score: f64,
    pub source: ScoreSource,
}

impl QuestionScore {
    /// Diagnostic describing a fallback or a miss, if any
    pub fn diagnostic(&self, category: &str, question: &str, answer: &str) -> Option<Diagnostic> {
        match &self.source {
            ScoreSource::Question => None,
            ScoreSource::Scale(scale) => Some(Diagnostic::DefaultScaleUsed {
                category: category.to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
                scale: scale.clone(),
            }),
            ScoreSource::Missing => Some(Diagnostic::MissingScore {
                category: category.to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
            }),
        }
    }
}

/// One answered question as seen by aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAnswer {
    pub question: String,
    pub score: f64,
    pub weight: f64,
    pub tag: AnswerTag,
}

impl ScoredAnswer {
    pub fn scoring(question: impl Into<String>, score: f64, weight: f64) -> Self {
        Self {
            question: question.into(),
            score,
            weight,
            tag: AnswerTag::Scoring,
        }
    }

    pub fn annotation(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            score: 0.0,
            weight: 0.0,
            tag: AnswerTag::Annotation,
        }
    }
}

/// Aggregated score of one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub score: f64,
    /// Set when the strategy had nothing to work with and fell back to 0
    pub degenerate: Option<DegenerateReason>,
}

impl Aggregate {
    fn value(score: f64) -> Self {
        Self {
            score,
            degenerate: None,
        }
    }

    fn degenerate(reason: DegenerateReason) -> Self {
        Self {
            score: 0.0,
            degenerate: Some(reason),
        }
    }

    pub fn diagnostic(&self, category: &Category) -> Option<Diagnostic> {
        self.degenerate
            .map(|reason| Diagnostic::DegenerateAggregation {
                category: category.id.clone(),
                strategy: category.strategy,
                reason,
            })
    }
}

/// Scores answers against a snapshot
#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl<'a> ScoreEngine<'a> {
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self { snapshot }
    }

    /// Score `answer` for a question of `category`
    pub fn score_question(
        &self,
        category: &str,
        question_id: &str,
        answer: &str,
    ) -> Result<QuestionScore> {
        let category = self.category(category)?;
        let question = category
            .question(question_id)
            .ok_or_else(|| RuntimeError::UnknownQuestion {
                category: category.id.clone(),
                question: question_id.to_string(),
            })?;
        Ok(self.score(question, answer))
    }

    /// Score an answer for an already resolved question
    ///
    /// The question's own map wins; otherwise the default scales are tried,
    /// the question's own scale first.
    pub fn score(&self, question: &QuestionConfig, answer: &str) -> QuestionScore {
        if let Some(score) = question.scoring.get(answer) {
            return QuestionScore {
                score: *score,
                source: ScoreSource::Question,
            };
        }

        match self
            .snapshot
            .scales()
            .lookup(question.default_scale.as_deref(), answer)
        {
            Some(found) => QuestionScore {
                score: found.score,
                source: ScoreSource::Scale(found.scale.to_string()),
            },
            None => QuestionScore {
                score: 0.0,
                source: ScoreSource::Missing,
            },
        }
    }

    /// Aggregate question scores with the category's strategy
    pub fn aggregate(&self, category: &str, answers: &[ScoredAnswer]) -> Result<Aggregate> {
        let category = self.category(category)?;
        Ok(aggregate(category.strategy, answers))
    }

    fn category(&self, id: &str) -> Result<&'a Category> {
        self.snapshot
            .category(id)
            .ok_or_else(|| RuntimeError::UnknownCategory(id.to_string()))
    }
}

/// Combine scores with `strategy`, ignoring annotation entries
pub fn aggregate(strategy: AggregationStrategy, answers: &[ScoredAnswer]) -> Aggregate {
    let scoring: Vec<&ScoredAnswer> = answers
        .iter()
        .filter(|answer| answer.tag.is_scoring())
        .collect();

    if scoring.is_empty() {
        return Aggregate::degenerate(DegenerateReason::NoScoringEntries);
    }

    let scores = scoring.iter().map(|answer| answer.score);
    match strategy {
        AggregationStrategy::Sum => Aggregate::value(scores.sum()),
        AggregationStrategy::Average => {
            Aggregate::value(scores.sum::<f64>() / scoring.len() as f64)
        }
        AggregationStrategy::WeightedAverage => {
            let total_weight: f64 = scoring.iter().map(|answer| answer.weight).sum();
            if total_weight == 0.0 {
                return Aggregate::degenerate(DegenerateReason::ZeroTotalWeight);
            }
            let weighted: f64 = scoring
                .iter()
                .map(|answer| answer.score * answer.weight)
                .sum();
            Aggregate::value(weighted / total_weight)
        }
        AggregationStrategy::Max => Aggregate::value(scores.fold(f64::NEG_INFINITY, f64::max)),
        AggregationStrategy::Min => Aggregate::value(scores.fold(f64::INFINITY, f64::min)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aira_core::{
        ConfigDefinitions, DefaultScale, ScaleSet, SourceFingerprint, ThresholdRange,
        ThresholdTable,
    };

    fn snapshot() -> ConfigSnapshot {
        let oversight = Category::new("oversight", AggregationStrategy::Max).with_question(
            QuestionConfig::new("oversight", "oversight")
                .with_score("full", 1.0)
                .with_default_scale("frequency"),
        );
        let scales = ScaleSet::new(
            vec![
                DefaultScale::new("likert").with_score("often", 2.0),
                DefaultScale::new("frequency")
                    .with_score("often", 3.0)
                    .with_score("never", 4.0),
            ],
            &[],
        );
        let thresholds =
            ThresholdTable::new(vec![ThresholdRange::new("low", 0.0, 10.0, "low")]).unwrap();
        let definitions = ConfigDefinitions::new(vec![oversight], thresholds).with_scales(scales);
        ConfigSnapshot::new(1, SourceFingerprint::new(), definitions, vec![])
    }

    #[test]
    fn test_score_from_question_map() {
        let snapshot = snapshot();
        let engine = ScoreEngine::new(&snapshot);

        let score = engine.score_question("oversight", "oversight", "full").unwrap();
        assert_eq!(score.score, 1.0);
        assert_eq!(score.source, ScoreSource::Question);
        assert!(score.diagnostic("oversight", "oversight", "full").is_none());
    }

    #[test]
    fn test_question_scale_reference_wins() {
        let snapshot = snapshot();
        let engine = ScoreEngine::new(&snapshot);

        // likert is declared first but the question names frequency
        let score = engine.score_question("oversight", "oversight", "often").unwrap();
        assert_eq!(score.score, 3.0);
        assert_eq!(score.source, ScoreSource::Scale("frequency".to_string()));
    }

    #[test]
    fn test_total_miss_scores_zero_with_warning() {
        let snapshot = snapshot();
        let engine = ScoreEngine::new(&snapshot);

        let score = engine.score_question("oversight", "oversight", "sometimes").unwrap();
        assert_eq!(score.score, 0.0);
        let diagnostic = score.diagnostic("oversight", "oversight", "sometimes").unwrap();
        assert!(diagnostic.is_warning());
    }

    #[test]
    fn test_unknown_category_and_question() {
        let snapshot = snapshot();
        let engine = ScoreEngine::new(&snapshot);

        assert_eq!(
            engine.score_question("impact", "impact", "x"),
            Err(RuntimeError::UnknownCategory("impact".to_string()))
        );
        assert!(matches!(
            engine.score_question("oversight", "oversight_scope", "x"),
            Err(RuntimeError::UnknownQuestion { .. })
        ));
    }

    #[test]
    fn test_strategies() {
        let answers = vec![
            ScoredAnswer::scoring("a", 1.0, 1.0),
            ScoredAnswer::scoring("b", 4.0, 0.5),
            ScoredAnswer::scoring("c", 2.0, 0.5),
        ];

        assert_eq!(aggregate(AggregationStrategy::Sum, &answers).score, 7.0);
        assert_eq!(aggregate(AggregationStrategy::Average, &answers).score, 7.0 / 3.0);
        assert_eq!(aggregate(AggregationStrategy::WeightedAverage, &answers).score, 2.0);
        assert_eq!(aggregate(AggregationStrategy::Max, &answers).score, 4.0);
        assert_eq!(aggregate(AggregationStrategy::Min, &answers).score, 1.0);
    }

    #[test]
    fn test_annotations_are_excluded() {
        let answers = vec![
            ScoredAnswer::scoring("a", 2.0, 1.0),
            ScoredAnswer::annotation("a_reasoning"),
        ];

        assert_eq!(aggregate(AggregationStrategy::Average, &answers).score, 2.0);
        assert_eq!(aggregate(AggregationStrategy::Min, &answers).score, 2.0);
    }

    #[test]
    fn test_no_scoring_entries_is_zero_for_every_strategy() {
        let only_annotations = vec![ScoredAnswer::annotation("notes")];
        for strategy in [
            AggregationStrategy::Sum,
            AggregationStrategy::Average,
            AggregationStrategy::WeightedAverage,
            AggregationStrategy::Max,
            AggregationStrategy::Min,
        ] {
            for answers in [&[][..], &only_annotations[..]] {
                let result = aggregate(strategy, answers);
                assert_eq!(result.score, 0.0, "{}", strategy);
                assert_eq!(result.degenerate, Some(DegenerateReason::NoScoringEntries));
            }
        }
    }

    #[test]
    fn test_zero_total_weight() {
        let answers = vec![ScoredAnswer::scoring("a", 3.0, 0.0)];
        let result = aggregate(AggregationStrategy::WeightedAverage, &answers);

        assert_eq!(result.score, 0.0);
        assert!(!result.score.is_nan());
        assert_eq!(result.degenerate, Some(DegenerateReason::ZeroTotalWeight));
    }

    #[test]
    fn test_equal_weights_match_mean() {
        let answers: Vec<ScoredAnswer> = [1.0, 2.0, 4.0, 3.0]
            .iter()
            .enumerate()
            .map(|(i, score)| ScoredAnswer::scoring(format!("q{}", i), *score, 0.7))
            .collect();

        let weighted = aggregate(AggregationStrategy::WeightedAverage, &answers).score;
        let mean = aggregate(AggregationStrategy::Average, &answers).score;
        assert!((weighted - mean).abs() < 1e-12);
    }
}
