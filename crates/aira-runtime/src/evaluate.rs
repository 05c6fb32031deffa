//! Evaluation facade
//!
//! [`evaluate`] combines scoring, classification and recommendation
//! resolution into one call. It only reads its inputs, so the same answers and
//! snapshot always produce the same result and any number of evaluations can
//! share a snapshot without locking.

use aira_core::{AnswerSet, ConfigSnapshot, Diagnostic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classifier::{Classification, Classifier};
use crate::recommendation::RecommendationResolver;
use crate::score::{aggregate, ScoreEngine, ScoredAnswer};

/// Evaluation options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    /// Include Info-level diagnostics (scale fallbacks, ignored answers)
    #[serde(default)]
    pub trace: bool,
}

impl EvaluationOptions {
    pub fn traced() -> Self {
        Self { trace: true }
    }
}

/// Recommendations for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Baseline list for the resolved level
    pub baseline: Vec<String>,
    /// Matched conditional recommendations, in rule order
    pub conditional: Vec<String>,
}

impl Recommendations {
    /// Baseline followed by conditional recommendations
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.baseline
            .iter()
            .chain(self.conditional.iter())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.baseline.len() + self.conditional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of evaluating one answer set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Sum of the per-category scores
    pub total_score: f64,
    pub level: String,
    pub classification: Classification,
    /// Category id → aggregated score
    pub per_category_score: BTreeMap<String, f64>,
    /// Category id → question id → score
    pub per_question_score: BTreeMap<String, BTreeMap<String, f64>>,
    pub recommendations: Recommendations,
    pub diagnostics: Vec<Diagnostic>,
    /// Version of the snapshot the result was computed against
    pub snapshot_version: u64,
}

impl EvaluationResult {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}

/// Collects diagnostics, dropping Info entries unless tracing
struct DiagnosticSink {
    trace: bool,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    fn new(trace: bool) -> Self {
        Self {
            trace,
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, diagnostic: Option<Diagnostic>) {
        if let Some(diagnostic) = diagnostic {
            if self.trace || diagnostic.is_warning() {
                self.diagnostics.push(diagnostic);
            }
        }
    }
}

/// Evaluate with default options
pub fn evaluate(answers: &AnswerSet, snapshot: &ConfigSnapshot) -> EvaluationResult {
    evaluate_with_options(answers, snapshot, EvaluationOptions::default())
}

/// Evaluate an answer set against a snapshot
pub fn evaluate_with_options(
    answers: &AnswerSet,
    snapshot: &ConfigSnapshot,
    options: EvaluationOptions,
) -> EvaluationResult {
    let engine = ScoreEngine::new(snapshot);
    let mut sink = DiagnosticSink::new(options.trace);

    for (question, entry) in answers.iter() {
        if entry.tag.is_scoring() && snapshot.question(question).is_none() {
            sink.push(Some(Diagnostic::IgnoredAnswer {
                question: question.to_string(),
            }));
        }
    }

    let mut per_category_score = BTreeMap::new();
    let mut per_question_score = BTreeMap::new();

    for category in snapshot.categories() {
        let mut scored = Vec::with_capacity(category.questions.len());
        let mut question_scores = BTreeMap::new();

        for question in &category.questions {
            let Some(entry) = answers.get(&question.id) else {
                continue;
            };
            if !entry.tag.is_scoring() {
                scored.push(ScoredAnswer::annotation(question.id.as_str()));
                continue;
            }

            let result = engine.score(question, &entry.value);
            sink.push(result.diagnostic(&category.id, &question.id, &entry.value));
            question_scores.insert(question.id.clone(), result.score);
            scored.push(ScoredAnswer::scoring(
                question.id.as_str(),
                result.score,
                question.weight,
            ));
        }

        let aggregated = aggregate(category.strategy, &scored);
        sink.push(aggregated.diagnostic(category));

        per_category_score.insert(category.id.clone(), aggregated.score);
        per_question_score.insert(category.id.clone(), question_scores);
    }

    let total_score: f64 = per_category_score.values().sum();

    let matched = Classifier::new(snapshot.thresholds()).classify(total_score);
    sink.push(matched.diagnostic());

    let resolver = RecommendationResolver::new(snapshot.recommendations());
    let recommendations = Recommendations {
        baseline: resolver.baseline(matched.level()).to_vec(),
        conditional: resolver
            .conditional(answers)
            .into_iter()
            .map(String::from)
            .collect(),
    };

    EvaluationResult {
        total_score,
        level: matched.level().to_string(),
        classification: matched.classification,
        per_category_score,
        per_question_score,
        recommendations,
        diagnostics: sink.diagnostics,
        snapshot_version: snapshot.version(),
    }
}
