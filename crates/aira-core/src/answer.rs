//! Answer sets submitted for evaluation
//!
//! Every entry carries an explicit [`AnswerTag`]. Only `Scoring` entries take
//! part in aggregation; `Annotation` entries (free-text reasoning and similar)
//! travel with the answers but never contribute a score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix that marks a free-text field in untagged legacy input
pub const LEGACY_ANNOTATION_SUFFIX: &str = "_reasoning";

/// Role of an answer entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerTag {
    /// Categorical answer key that is scored
    #[default]
    Scoring,
    /// Free text that is carried along but never scored
    Annotation,
}

impl AnswerTag {
    pub fn is_scoring(self) -> bool {
        matches!(self, AnswerTag::Scoring)
    }
}

/// A single submitted answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    /// Answer key (or free text for annotations)
    pub value: String,

    /// Entry role
    #[serde(default)]
    pub tag: AnswerTag,
}

impl AnswerEntry {
    pub fn scoring(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: AnswerTag::Scoring,
        }
    }

    pub fn annotation(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: AnswerTag::Annotation,
        }
    }
}

/// Raw answer as accepted at the ingestion boundary
///
/// A plain string is legacy input and is tagged by key suffix; a map with
/// `value`/`tag` is taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerInput {
    Plain(String),
    Tagged(AnswerEntry),
}

/// Question id → answer mapping for one assessment
///
/// Backed by an ordered map so iteration (and everything derived from it) is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: BTreeMap<String, AnswerEntry>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scoring answer
    pub fn with_scoring(mut self, question: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(question, AnswerEntry::scoring(value));
        self
    }

    /// Add an annotation
    pub fn with_annotation(
        mut self,
        question: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(question, AnswerEntry::annotation(value));
        self
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, question: impl Into<String>, entry: AnswerEntry) {
        self.entries.insert(question.into(), entry);
    }

    /// Build from an untagged flat map
    ///
    /// Keys ending in [`LEGACY_ANNOTATION_SUFFIX`] become annotations, every
    /// other key is a scoring answer.
    pub fn from_legacy<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            let key = key.into();
            let entry = if key.ends_with(LEGACY_ANNOTATION_SUFFIX) {
                AnswerEntry::annotation(value)
            } else {
                AnswerEntry::scoring(value)
            };
            set.insert(key, entry);
        }
        set
    }

    /// Build from ingestion input, mixing tagged and legacy entries
    pub fn from_inputs<I, K>(inputs: I) -> Self
    where
        I: IntoIterator<Item = (K, AnswerInput)>,
        K: Into<String>,
    {
        let mut set = Self::new();
        for (key, input) in inputs {
            let key = key.into();
            match input {
                AnswerInput::Tagged(entry) => set.insert(key, entry),
                AnswerInput::Plain(value) => {
                    let legacy = Self::from_legacy([(key, value)]);
                    set.entries.extend(legacy.entries);
                }
            }
        }
        set
    }

    pub fn get(&self, question: &str) -> Option<&AnswerEntry> {
        self.entries.get(question)
    }

    /// Submitted value for a field, regardless of tag
    pub fn value(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(|entry| entry.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
