//! Subcommand implementations

use aira_sdk::{
    AssessmentEngine, ConfigIssue, ConfigSnapshot, EvaluationResult, Severity,
};
use anyhow::Result;
use std::fmt;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

use crate::answers::load_answers;

/// Score an answer file and print the result
pub async fn evaluate(engine: &AssessmentEngine, answers: &Path, json: bool) -> Result<ExitCode> {
    let answers = load_answers(answers).await?;
    let snapshot = engine.snapshot();
    let result = engine.evaluate_with(&answers, &snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_result(&result, &snapshot));
    }
    Ok(ExitCode::SUCCESS)
}

/// Print configuration issues; fails when any is an error
pub async fn validate(engine: &AssessmentEngine) -> Result<ExitCode> {
    let issues = engine.validate().await;
    print!("{}", render_issues(&issues));

    if issues.iter().any(ConfigIssue::is_error) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print categories and their questions
pub fn list(engine: &AssessmentEngine) -> Result<ExitCode> {
    print!("{}", render_listing(&engine.snapshot()));
    Ok(ExitCode::SUCCESS)
}

/// Poll for configuration changes until Ctrl-C
pub async fn watch(engine: &AssessmentEngine, interval: Duration) -> Result<ExitCode> {
    let watcher = engine.spawn_watcher(interval)?;
    info!(
        version = watcher.version(),
        "Watching {} every {:?} (Ctrl-C to stop)",
        engine.store().source_description(),
        interval
    );

    tokio::signal::ctrl_c().await?;
    watcher.stop().await;
    info!(version = engine.snapshot().version(), "Stopped watching");
    Ok(ExitCode::SUCCESS)
}

pub fn render_result(result: &EvaluationResult, snapshot: &ConfigSnapshot) -> String {
    ResultReport { result, snapshot }.to_string()
}

pub fn render_issues(issues: &[ConfigIssue]) -> String {
    IssueReport { issues }.to_string()
}

pub fn render_listing(snapshot: &ConfigSnapshot) -> String {
    Listing { snapshot }.to_string()
}

struct ResultReport<'a> {
    result: &'a EvaluationResult,
    snapshot: &'a ConfigSnapshot,
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        write!(f, "Risk level: {}", result.level)?;
        if let Some(color) = self
            .snapshot
            .style_for(&result.level)
            .and_then(|style| style.get("color"))
        {
            write!(f, " [{}]", color)?;
        }
        writeln!(f)?;
        writeln!(f, "Total score: {:.2}", result.total_score)?;

        writeln!(f, "\nCategories:")?;
        for (category, score) in &result.per_category_score {
            writeln!(f, "  {:<24} {:>6.2}", category, score)?;
            if let Some(questions) = result.per_question_score.get(category) {
                for (question, score) in questions {
                    writeln!(f, "    {:<22} {:>6.2}", question, score)?;
                }
            }
        }

        if !result.recommendations.is_empty() {
            writeln!(f, "\nRecommendations:")?;
            for recommendation in result.recommendations.all() {
                writeln!(f, "  - {}", recommendation)?;
            }
        }

        if !result.diagnostics.is_empty() {
            writeln!(f, "\nDiagnostics:")?;
            for diagnostic in &result.diagnostics {
                writeln!(f, "  [{:?}] {}", diagnostic.level(), diagnostic)?;
            }
        }

        writeln!(f, "\nConfiguration version {}", result.snapshot_version)
    }
}

struct IssueReport<'a> {
    issues: &'a [ConfigIssue],
}

impl fmt::Display for IssueReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Configuration is valid");
        }

        let mut sorted: Vec<&ConfigIssue> = self.issues.iter().collect();
        // Errors first, otherwise in discovery order
        sorted.sort_by_key(|issue| std::cmp::Reverse(issue.severity()));

        for issue in &sorted {
            let label = match issue.severity() {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            writeln!(f, "{}: {}", label, issue)?;
        }

        let errors = self.issues.iter().filter(|issue| issue.is_error()).count();
        writeln!(
            f,
            "\n{} error(s), {} warning(s)",
            errors,
            self.issues.len() - errors
        )
    }
}

struct Listing<'a> {
    snapshot: &'a ConfigSnapshot,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in self.snapshot.categories() {
            writeln!(
                f,
                "{} ({}, {} question(s))",
                category.id,
                category.strategy,
                category.questions.len()
            )?;
            for question in &category.questions {
                let title = question
                    .metadata
                    .as_ref()
                    .and_then(|metadata| metadata.title.as_deref())
                    .unwrap_or("");
                let options = question.exposed_keys().count();
                writeln!(
                    f,
                    "  {:<24} weight {:<5} {} option(s)  {}",
                    question.id, question.weight, options, title
                )?;
            }
        }

        writeln!(
            f,
            "\nLevels: {}",
            self.snapshot.thresholds().levels().join(", ")
        )?;
        writeln!(f, "Configuration version {}", self.snapshot.version())
    }
}
