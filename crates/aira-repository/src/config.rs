//! Source configuration types
//!
//! This module provides configuration for sources that can be described
//! declaratively (files on disk) and their file layout. In-memory sources
//! are handed to the store directly.

use serde::{Deserialize, Serialize};

/// Source type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Load from YAML files on disk
    #[default]
    FileSystem,
}

/// File names inside a file system source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
    /// Directory holding one `<category>.yaml` per category
    #[serde(default = "default_questions_dir")]
    pub questions_dir: String,

    /// Scoring document (dimensions, thresholds, styling, default scales)
    #[serde(default = "default_scoring_file")]
    pub scoring_file: String,

    /// Recommendations document (baseline and conditional)
    #[serde(default = "default_recommendations_file")]
    pub recommendations_file: String,
}

fn default_questions_dir() -> String {
    "questions".to_string()
}

fn default_scoring_file() -> String {
    "scoring_flexible.yaml".to_string()
}

fn default_recommendations_file() -> String {
    "recommendations.yaml".to_string()
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            questions_dir: default_questions_dir(),
            scoring_file: default_scoring_file(),
            recommendations_file: default_recommendations_file(),
        }
    }
}

/// Source configuration
///
/// # Examples
///
/// ```rust
/// use aira_repository::SourceConfig;
///
/// let config = SourceConfig::file_system("config");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source type
    #[serde(default)]
    pub source: SourceKind,

    /// Base directory (required for FileSystem source)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    /// File layout under `base_path`
    #[serde(flatten)]
    pub layout: SourceLayout,
}

impl SourceConfig {
    /// Create a file system source configuration
    pub fn file_system(path: impl Into<String>) -> Self {
        Self {
            source: SourceKind::FileSystem,
            base_path: Some(path.into()),
            layout: SourceLayout::default(),
        }
    }

    /// Override the file layout
    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Validate the configuration
    ///
    /// Returns an error if required fields are missing for the selected source.
    pub fn validate(&self) -> Result<(), SourceConfigError> {
        match self.source {
            SourceKind::FileSystem => {
                if self.base_path.is_none() {
                    return Err(SourceConfigError::MissingField {
                        source: "FileSystem".to_string(),
                        field: "base_path".to_string(),
                    });
                }
                if self.layout.scoring_file.trim().is_empty() {
                    return Err(SourceConfigError::MissingField {
                        source: "FileSystem".to_string(),
                        field: "layout.scoring_file".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Source configuration error
#[derive(Debug, Clone)]
pub enum SourceConfigError {
    /// A required field is missing for the selected source
    MissingField { source: String, field: String },
}

impl std::fmt::Display for SourceConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceConfigError::MissingField { source, field } => {
                write!(f, "{} source requires {} to be set", source, field)
            }
        }
    }
}

impl std::error::Error for SourceConfigError {}
