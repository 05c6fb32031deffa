//! Raw documents read from a configuration source
//!
//! Sources only read text; parsing into definitions happens in
//! [`crate::loader`], so every source shares one set of parsing rules.

use aira_core::SourceFingerprint;

/// Everything one load reads from a source
#[derive(Debug, Clone, Default)]
pub struct SourceDocuments {
    /// Question definitions (category id, yaml content), ordered by category id
    pub questions: Vec<(String, String)>,

    /// Scoring document
    pub scoring: String,

    /// Recommendations document, if the source has one
    pub recommendations: Option<String>,

    /// Fingerprint taken before the documents were read
    pub fingerprint: SourceFingerprint,
}

impl SourceDocuments {
    /// Create documents from a scoring document alone
    pub fn new(scoring: impl Into<String>) -> Self {
        Self {
            scoring: scoring.into(),
            ..Self::default()
        }
    }

    /// Add a question definition document
    pub fn add_questions(&mut self, category: impl Into<String>, content: impl Into<String>) {
        self.questions.push((category.into(), content.into()));
    }

    pub fn with_recommendations(mut self, content: impl Into<String>) -> Self {
        self.recommendations = Some(content.into());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: SourceFingerprint) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Get total count of documents
    pub fn total_count(&self) -> usize {
        1 + self.questions.len() + usize::from(self.recommendations.is_some())
    }
}
