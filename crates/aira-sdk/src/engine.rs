//! AssessmentEngine - evaluation over a hot-reloadable configuration

use aira_core::{AnswerSet, ConfigIssue, ConfigSnapshot};
use aira_repository::ConfigStore;
use aira_runtime::{evaluate_with_options, EvaluationOptions, EvaluationResult};
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::watcher::ConfigWatcher;

/// Entry point for scoring answer sets
///
/// Cloning is cheap; clones share the same store and see the same reloads.
#[derive(Clone)]
pub struct AssessmentEngine {
    store: Arc<ConfigStore>,
    config: EngineConfig,
}

impl AssessmentEngine {
    pub(crate) fn new(store: Arc<ConfigStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying snapshot store
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Snapshot new evaluations will use
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.store.current()
    }

    /// Evaluate against the active snapshot
    pub fn evaluate(&self, answers: &AnswerSet) -> EvaluationResult {
        let snapshot = self.store.current();
        self.evaluate_with(answers, &snapshot)
    }

    /// Evaluate against a snapshot the caller pinned earlier
    pub fn evaluate_with(&self, answers: &AnswerSet, snapshot: &ConfigSnapshot) -> EvaluationResult {
        let options = EvaluationOptions {
            trace: self.config.trace,
        };
        let result = evaluate_with_options(answers, snapshot, options);

        for diagnostic in result.warnings() {
            tracing::warn!(version = result.snapshot_version, "{}", diagnostic);
        }
        tracing::debug!(
            version = result.snapshot_version,
            answers = answers.len(),
            total = result.total_score,
            level = %result.level,
            recommendations = result.recommendations.len(),
            "Evaluated answer set"
        );

        result
    }

    /// Issues found in the current state of the source
    pub async fn validate(&self) -> Vec<ConfigIssue> {
        self.store.validate().await
    }

    /// Reload the configuration, keeping the active snapshot on failure
    pub async fn reload(&self) -> Result<Arc<ConfigSnapshot>> {
        Ok(self.store.reload().await?)
    }

    /// Whether the source changed since the active snapshot was loaded
    pub async fn check_for_changes(&self) -> Result<bool> {
        Ok(self.store.check_for_changes().await?)
    }

    /// Reload when the source changed; `None` when it did not
    pub async fn reload_if_changed(&self) -> Result<Option<Arc<ConfigSnapshot>>> {
        Ok(self.store.reload_if_changed().await?)
    }

    /// Start polling for changes every `interval`
    ///
    /// Fails with [`SdkError::InvalidConfig`] when `interval` is zero.
    pub fn spawn_watcher(&self, interval: Duration) -> Result<ConfigWatcher> {
        if interval.is_zero() {
            return Err(SdkError::InvalidConfig(
                "watch interval must be positive".to_string(),
            ));
        }
        Ok(ConfigWatcher::spawn(Arc::clone(&self.store), interval))
    }

    /// Start polling at the configured interval
    pub fn watch(&self) -> Result<ConfigWatcher> {
        self.spawn_watcher(self.config.poll_interval())
    }
}

impl std::fmt::Debug for AssessmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentEngine")
            .field("source", &self.store.source_description())
            .field("version", &self.store.current().version())
            .field("config", &self.config)
            .finish()
    }
}
