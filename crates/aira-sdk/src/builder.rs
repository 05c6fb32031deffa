//! Builder pattern for AssessmentEngine

use aira_repository::{source_from_config, ConfigSource, ConfigStore, SourceConfig};
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::engine::AssessmentEngine;
use crate::error::{Result, SdkError};

/// Where the builder gets its configuration from
enum SourceChoice {
    Config(SourceConfig),
    Source(Arc<dyn ConfigSource>),
}

/// Builder for AssessmentEngine
///
/// # Example
///
/// ```rust,ignore
/// use aira_sdk::{AssessmentEngineBuilder, SourceConfig};
///
/// // From a directory of YAML files
/// let engine = AssessmentEngineBuilder::new()
///     .with_source_config(SourceConfig::file_system("config"))
///     .enable_trace(true)
///     .build()
///     .await?;
///
/// // From an in-memory source (for testing or embedding)
/// let source = Arc::new(MemorySource::new(scoring_yaml));
/// let engine = AssessmentEngineBuilder::new()
///     .with_source(source)
///     .build()
///     .await?;
/// ```
pub struct AssessmentEngineBuilder {
    config: EngineConfig,
    source: Option<SourceChoice>,
}

impl AssessmentEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            source: None,
        }
    }

    /// Load configuration from the source described by `config`
    pub fn with_source_config(mut self, config: SourceConfig) -> Self {
        self.source = Some(SourceChoice::Config(config));
        self
    }

    /// Load configuration from an already constructed source
    pub fn with_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.source = Some(SourceChoice::Source(source));
        self
    }

    /// Replace the engine configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the load timeout
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_load_timeout(timeout);
        self
    }

    /// Set the watcher polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_poll_interval(interval);
        self
    }

    /// Prefer a default scale during lookups
    pub fn with_scale_priority(mut self, scale: impl Into<String>) -> Self {
        self.config = self.config.with_scale_priority(scale);
        self
    }

    /// Include Info-level diagnostics in evaluations
    pub fn enable_trace(mut self, enable: bool) -> Self {
        self.config = self.config.enable_trace(enable);
        self
    }

    /// Build the engine, loading the initial snapshot
    ///
    /// Fails with [`SdkError::NotConfigured`] when no source was given, and
    /// with the load error when the initial configuration is unusable.
    pub async fn build(self) -> Result<AssessmentEngine> {
        self.config.validate()?;

        let source = match self.source {
            Some(SourceChoice::Config(config)) => source_from_config(&config)?,
            Some(SourceChoice::Source(source)) => source,
            None => return Err(SdkError::NotConfigured),
        };

        let store = ConfigStore::open(source, self.config.store_options()).await?;
        Ok(AssessmentEngine::new(Arc::new(store), self.config))
    }
}

impl Default for AssessmentEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aira_repository::MemorySource;

    const SCORING: &str = r#"
dimensions:
  impact:
    aggregation: max
    questions:
      impact:
        scoring: { internal: 1, external: 4 }
risk_thresholds:
  low: { min: 0, max: 2, level: low }
  high: { min: 3, max: 4, level: high }
"#;

    #[tokio::test]
    async fn test_build_without_source() {
        let result = AssessmentEngineBuilder::new().build().await;
        assert!(matches!(result, Err(SdkError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_build_with_memory_source() {
        let source = Arc::new(MemorySource::new(SCORING));
        let engine = AssessmentEngineBuilder::new()
            .with_source(source)
            .enable_trace(true)
            .build()
            .await
            .unwrap();

        assert!(engine.config().trace);
        assert_eq!(engine.snapshot().version(), 1);
    }

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let source = Arc::new(MemorySource::new(SCORING));
        let result = AssessmentEngineBuilder::new()
            .with_source(source)
            .with_poll_interval(Duration::ZERO)
            .build()
            .await;

        assert!(matches!(result, Err(SdkError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_build_with_sub_second_poll_interval() {
        let source = Arc::new(MemorySource::new(SCORING));
        let engine = AssessmentEngineBuilder::new()
            .with_source(source)
            .with_poll_interval(Duration::from_millis(500))
            .build()
            .await
            .unwrap();

        assert_eq!(engine.config().poll_interval(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_build_with_missing_directory() {
        let result = AssessmentEngineBuilder::new()
            .with_source_config(SourceConfig::file_system("/nonexistent/aira/config"))
            .build()
            .await;

        assert!(matches!(result, Err(SdkError::Repository(_))));
    }
}
