//! In-memory configuration source
//!
//! Holds documents as strings and bumps a per-unit revision on every write,
//! which gives the store the same change detection a file system source has.

use async_trait::async_trait;
use aira_core::{SourceFingerprint, UnitStamp};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::{traits::ConfigSource, RepositoryResult, SourceDocuments};

const SCORING_UNIT: &str = "scoring";
const RECOMMENDATIONS_UNIT: &str = "recommendations";

#[derive(Debug, Default)]
struct MemoryState {
    questions: BTreeMap<String, String>,
    scoring: String,
    recommendations: Option<String>,
    revisions: BTreeMap<String, u64>,
    counter: u64,
}

impl MemoryState {
    fn bump(&mut self, unit: String) {
        self.counter += 1;
        self.revisions.insert(unit, self.counter);
    }

    fn fingerprint(&self) -> SourceFingerprint {
        let mut fingerprint = SourceFingerprint::new();
        for (unit, revision) in &self.revisions {
            fingerprint.insert(unit.clone(), UnitStamp::Revision { revision: *revision });
        }
        fingerprint
    }
}

/// In-memory configuration source
///
/// # Example
///
/// ```rust
/// use aira_repository::MemorySource;
///
/// let source = MemorySource::new("dimensions: {}\nrisk_thresholds: {}\n");
/// source.set_questions("autonomy", "autonomy_questions: {}\n");
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    state: RwLock<MemoryState>,
}

impl MemorySource {
    /// Create a source holding only a scoring document
    pub fn new(scoring: impl Into<String>) -> Self {
        let source = Self::default();
        source.set_scoring(scoring);
        source
    }

    /// Replace the scoring document
    pub fn set_scoring(&self, content: impl Into<String>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.scoring = content.into();
        state.bump(SCORING_UNIT.to_string());
    }

    /// Replace the recommendations document
    pub fn set_recommendations(&self, content: impl Into<String>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.recommendations = Some(content.into());
        state.bump(RECOMMENDATIONS_UNIT.to_string());
    }

    /// Add or replace the question definitions of a category
    pub fn set_questions(&self, category: impl Into<String>, content: impl Into<String>) {
        let category = category.into();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.questions.insert(category.clone(), content.into());
        state.bump(format!("questions/{}", category));
    }

    /// Remove the question definitions of a category
    pub fn remove_questions(&self, category: &str) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let removed = state.questions.remove(category).is_some();
        if removed {
            state.revisions.remove(&format!("questions/{}", category));
        }
        removed
    }

    /// Number of writes applied so far
    pub fn revision(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .counter
    }
}

#[async_trait]
impl ConfigSource for MemorySource {
    async fn load_documents(&self) -> RepositoryResult<SourceDocuments> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        let mut documents =
            SourceDocuments::new(state.scoring.clone()).with_fingerprint(state.fingerprint());
        for (category, content) in &state.questions {
            documents.add_questions(category.clone(), content.clone());
        }
        documents.recommendations = state.recommendations.clone();

        Ok(documents)
    }

    async fn fingerprint(&self) -> RepositoryResult<SourceFingerprint> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.fingerprint())
    }

    fn describe(&self) -> String {
        format!("memory:r{}", self.revision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_change_fingerprint() {
        let source = MemorySource::new("dimensions: {}");
        let before = source.fingerprint().await.unwrap();

        source.set_questions("autonomy", "autonomy_questions: {}");
        let after = source.fingerprint().await.unwrap();

        assert_eq!(after.changed_units(&before), vec!["questions/autonomy"]);
        assert_eq!(source.revision(), 2);
    }

    #[tokio::test]
    async fn test_load_documents() {
        let source = MemorySource::new("dimensions: {}");
        source.set_questions("oversight", "oversight_questions: {}");
        source.set_questions("autonomy", "autonomy_questions: {}");
        source.set_recommendations("by_risk_level: {}");

        let documents = source.load_documents().await.unwrap();
        assert_eq!(documents.total_count(), 4);
        assert_eq!(documents.questions[0].0, "autonomy");
        assert_eq!(documents.fingerprint.len(), 4);
    }

    #[tokio::test]
    async fn test_remove_questions() {
        let source = MemorySource::new("dimensions: {}");
        source.set_questions("autonomy", "autonomy_questions: {}");

        assert!(source.remove_questions("autonomy"));
        assert!(!source.remove_questions("autonomy"));
        assert!(source.fingerprint().await.unwrap().get("questions/autonomy").is_none());
    }
}
