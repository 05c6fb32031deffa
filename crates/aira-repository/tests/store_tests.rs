//! ConfigStore behaviour against in-memory and slow sources

use aira_core::{ConfigError, ConfigIssue, SourceFingerprint};
use aira_repository::{
    ConfigSource, ConfigStore, MemorySource, RepositoryResult, SourceDocuments, StoreOptions,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

const SCORING: &str = r#"dimensions:
  impact:
    aggregation: max
    questions:
      impact:
        scoring: { internal: 1, external: 4 }
risk_thresholds:
  low: { min: 0, max: 2, level: low }
  high: { min: 3, max: 4, level: high }
"#;

const IMPACT: &str = r#"impact_questions:
  impact:
    options: [internal, external]
"#;

fn memory_source() -> Arc<MemorySource> {
    let source = MemorySource::new(SCORING);
    source.set_questions("impact", IMPACT);
    source.set_recommendations("by_risk_level:\n  low: [Monitor]\n  high: [Escalate]\n");
    Arc::new(source)
}

#[tokio::test]
async fn test_open_assigns_version_one() {
    let store = ConfigStore::open(memory_source(), StoreOptions::default())
        .await
        .unwrap();

    assert_eq!(store.current().version(), 1);
    assert!(store.source_description().starts_with("memory:"));
}

#[tokio::test]
async fn test_reload_increments_version() {
    let source = memory_source();
    let store = ConfigStore::open(source.clone(), StoreOptions::default())
        .await
        .unwrap();

    assert!(!store.check_for_changes().await.unwrap());
    assert!(store.reload_if_changed().await.unwrap().is_none());

    source.set_scoring(SCORING.replace("external: 4", "external: 3"));
    assert!(store.check_for_changes().await.unwrap());

    let reloaded = store.reload_if_changed().await.unwrap().unwrap();
    assert_eq!(reloaded.version(), 2);
    assert_eq!(store.current().version(), 2);

    // Explicit reload works without a change as well
    assert_eq!(store.reload().await.unwrap().version(), 3);
}

#[tokio::test]
async fn test_held_snapshot_survives_reload() {
    let source = memory_source();
    let store = ConfigStore::open(source.clone(), StoreOptions::default())
        .await
        .unwrap();

    let held = store.current();
    source.set_scoring(SCORING.replace("external: 4", "external: 2"));
    store.reload().await.unwrap();

    let current = store.current();
    let (_, before) = held.question("impact").unwrap();
    let (_, after) = current.question("impact").unwrap();
    assert_eq!(before.scoring["external"], 4.0);
    assert_eq!(after.scoring["external"], 2.0);
    assert_eq!(held.version(), 1);
}

#[tokio::test]
async fn test_failed_reload_keeps_snapshot_and_version() {
    let source = memory_source();
    let store = ConfigStore::open(source.clone(), StoreOptions::default())
        .await
        .unwrap();

    source.set_scoring("dimensions: [not, a, mapping]\nrisk_thresholds: {}\n");
    let err = store.reload().await.unwrap_err();
    assert!(matches!(err.config_error(), Some(ConfigError::Malformed { .. })));

    let current = store.current();
    assert_eq!(current.version(), 1);
    assert!(current.category("impact").is_some());

    // Still reported as changed until a reload succeeds
    assert!(store.check_for_changes().await.unwrap());

    source.set_scoring(SCORING);
    assert_eq!(store.reload().await.unwrap().version(), 2);
}

#[tokio::test]
async fn test_validate_reads_source_without_swapping() {
    let source = memory_source();
    let store = ConfigStore::open(source.clone(), StoreOptions::default())
        .await
        .unwrap();
    assert!(store.validate().await.is_empty());

    source.set_questions("impact", "impact_questions:\n  impact:\n    options: [internal, external, global]\n");
    let issues = store.validate().await;
    assert_eq!(
        issues,
        vec![ConfigIssue::MissingScore {
            category: "impact".to_string(),
            question: "impact".to_string(),
            key: "global".to_string(),
        }]
    );
    assert_eq!(store.current().version(), 1);

    source.set_scoring("dimensions: [");
    let issues = store.validate().await;
    assert_eq!(issues.len(), 1);
    assert!(matches!(issues[0], ConfigIssue::Malformed { .. }));
}

#[tokio::test]
async fn test_load_does_not_activate() {
    let source = memory_source();
    let store = ConfigStore::open(source.clone(), StoreOptions::default())
        .await
        .unwrap();

    source.set_scoring(SCORING.replace("max: 4", "max: 5"));
    let candidate = store.load().await.unwrap();

    assert_eq!(candidate.version(), 2);
    assert_eq!(candidate.thresholds().highest().max, 5.0);
    assert_eq!(store.current().thresholds().highest().max, 4.0);
}

/// Source that never finishes in time
struct SlowSource {
    inner: Arc<MemorySource>,
    delay: Duration,
}

#[async_trait]
impl ConfigSource for SlowSource {
    async fn load_documents(&self) -> RepositoryResult<SourceDocuments> {
        tokio::time::sleep(self.delay).await;
        self.inner.load_documents().await
    }

    async fn fingerprint(&self) -> RepositoryResult<SourceFingerprint> {
        self.inner.fingerprint().await
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

#[tokio::test(start_paused = true)]
async fn test_load_timeout() {
    let source = Arc::new(SlowSource {
        inner: memory_source(),
        delay: Duration::from_secs(30),
    });
    let options = StoreOptions {
        load_timeout: Duration::from_secs(5),
        ..StoreOptions::default()
    };

    let err = ConfigStore::open(source, options).await.unwrap_err();
    assert_eq!(
        err.config_error(),
        Some(&ConfigError::Timeout(Duration::from_secs(5)))
    );
}

#[tokio::test]
async fn test_concurrent_reloads_are_serialised() {
    let source = memory_source();
    let store = Arc::new(
        ConfigStore::open(source.clone(), StoreOptions::default())
            .await
            .unwrap(),
    );

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.reload().await.unwrap().version() }));
    }

    let mut versions = Vec::new();
    for handle in handles {
        versions.push(handle.await.unwrap());
    }
    versions.sort();

    assert_eq!(versions, (2..=9).collect::<Vec<u64>>());
    assert_eq!(store.current().version(), 9);
}
