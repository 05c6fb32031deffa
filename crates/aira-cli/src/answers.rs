//! Answer file loading

use aira_sdk::{AnswerInput, AnswerSet};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Parse a YAML (or JSON) map of question id to answer
///
/// Entries are either a plain string, tagged by key suffix, or a
/// `{ value, tag }` map.
pub fn parse_answers(content: &str) -> Result<AnswerSet> {
    let inputs: Option<BTreeMap<String, AnswerInput>> =
        serde_yaml::from_str(content).context("Answers must be a map of question id to answer")?;
    Ok(AnswerSet::from_inputs(inputs.unwrap_or_default()))
}

/// Read and parse an answer file
pub async fn load_answers(path: &Path) -> Result<AnswerSet> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read answer file: {}", path.display()))?;
    parse_answers(&content)
        .with_context(|| format!("Failed to parse answer file: {}", path.display()))
}
