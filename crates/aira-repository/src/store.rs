//! Snapshot store
//!
//! [`ConfigStore`] owns the active [`ConfigSnapshot`] behind an [`ArcSwap`].
//! Readers take the current `Arc` without locking; reloads build a complete
//! new snapshot off to the side and publish it with a single pointer store.

use aira_core::{ConfigError, ConfigIssue, ConfigSnapshot};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::loader::{DefinitionLoader, LoadedDefinitions};
use crate::{ConfigSource, RepositoryResult, SourceDocuments};

/// Default bound on a single load
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Store options
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Bound on reading the source during a load
    pub load_timeout: Duration,

    /// Default scale names to try first
    pub scale_priority: Vec<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            scale_priority: Vec::new(),
        }
    }
}

/// Holder of the active configuration snapshot
///
/// # Example
///
/// ```no_run
/// use aira_repository::{ConfigStore, FileSystemSource, StoreOptions};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let source = Arc::new(FileSystemSource::new("config")?);
/// let store = ConfigStore::open(source, StoreOptions::default()).await?;
///
/// let snapshot = store.current();
/// println!("version {} with {} questions", snapshot.version(), snapshot.question_count());
///
/// if store.check_for_changes().await? {
///     store.reload().await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConfigStore {
    source: Arc<dyn ConfigSource>,
    loader: DefinitionLoader,
    load_timeout: Duration,
    active: ArcSwap<ConfigSnapshot>,
    reload_lock: Mutex<()>,
}

impl ConfigStore {
    /// Open a store, loading the initial snapshot
    ///
    /// Any failure here is fatal: there is no previous snapshot to fall back to.
    pub async fn open(source: Arc<dyn ConfigSource>, options: StoreOptions) -> RepositoryResult<Self> {
        let loader = DefinitionLoader::new().with_scale_priority(options.scale_priority);
        let documents = read_documents(source.as_ref(), options.load_timeout).await?;
        let snapshot = build_snapshot(&loader, 1, documents)?;

        tracing::info!(
            version = snapshot.version(),
            categories = snapshot.categories().len(),
            questions = snapshot.question_count(),
            issues = snapshot.issues().len(),
            "Loaded configuration from {}",
            source.describe()
        );

        Ok(Self {
            source,
            loader,
            load_timeout: options.load_timeout,
            active: ArcSwap::from_pointee(snapshot),
            reload_lock: Mutex::new(()),
        })
    }

    /// Active snapshot
    ///
    /// Lock-free; the returned handle stays valid and unchanged across reloads.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        self.active.load_full()
    }

    /// Description of the underlying source
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Parse and validate the source into a snapshot without activating it
    ///
    /// The snapshot carries the version the next successful reload would get.
    pub async fn load(&self) -> RepositoryResult<ConfigSnapshot> {
        self.build_next(self.current().version() + 1).await
    }

    /// Whether any source unit differs from what the active snapshot was built from
    pub async fn check_for_changes(&self) -> RepositoryResult<bool> {
        let fingerprint = tokio::time::timeout(self.load_timeout, self.source.fingerprint())
            .await
            .map_err(|_| ConfigError::Timeout(self.load_timeout))??;

        let active = self.current();
        let changed = fingerprint.changed_units(active.fingerprint());
        if !changed.is_empty() {
            tracing::debug!(units = ?changed, "Configuration source changed");
        }
        Ok(!changed.is_empty())
    }

    /// Re-read the source and swap in the new snapshot
    ///
    /// On failure the active snapshot is left untouched and the error returned.
    pub async fn reload(&self) -> RepositoryResult<Arc<ConfigSnapshot>> {
        let _guard = self.reload_lock.lock().await;
        self.reload_locked().await
    }

    /// Reload only when [`check_for_changes`](Self::check_for_changes) reports a change
    pub async fn reload_if_changed(&self) -> RepositoryResult<Option<Arc<ConfigSnapshot>>> {
        let _guard = self.reload_lock.lock().await;
        if !self.check_for_changes().await? {
            return Ok(None);
        }
        self.reload_locked().await.map(Some)
    }

    /// Issues the next reload would see
    ///
    /// Reads the source rather than the active snapshot and never swaps.
    /// Unreadable or unparsable sources are reported as a single
    /// [`ConfigIssue::Malformed`].
    pub async fn validate(&self) -> Vec<ConfigIssue> {
        let documents = match read_documents(self.source.as_ref(), self.load_timeout).await {
            Ok(documents) => documents,
            Err(err) => {
                return vec![ConfigIssue::Malformed {
                    message: err.to_string(),
                }]
            }
        };

        match self.loader.parse(&documents) {
            Ok(loaded) => loaded.issues,
            Err(err) => vec![ConfigIssue::Malformed {
                message: err.to_string(),
            }],
        }
    }

    async fn build_next(&self, version: u64) -> RepositoryResult<ConfigSnapshot> {
        let documents = read_documents(self.source.as_ref(), self.load_timeout).await?;
        build_snapshot(&self.loader, version, documents)
    }

    async fn reload_locked(&self) -> RepositoryResult<Arc<ConfigSnapshot>> {
        let previous = self.current();

        match self.build_next(previous.version() + 1).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.active.store(Arc::clone(&snapshot));
                tracing::info!(
                    version = snapshot.version(),
                    previous = previous.version(),
                    categories = snapshot.categories().len(),
                    questions = snapshot.question_count(),
                    issues = snapshot.issues().len(),
                    "Reloaded configuration"
                );
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!(
                    version = previous.version(),
                    "Configuration reload failed, keeping active snapshot: {}",
                    err
                );
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("source", &self.source.describe())
            .field("version", &self.current().version())
            .field("load_timeout", &self.load_timeout)
            .finish()
    }
}

async fn read_documents(
    source: &dyn ConfigSource,
    timeout: Duration,
) -> RepositoryResult<SourceDocuments> {
    tokio::time::timeout(timeout, source.load_documents())
        .await
        .map_err(|_| ConfigError::Timeout(timeout))?
}

fn build_snapshot(
    loader: &DefinitionLoader,
    version: u64,
    documents: SourceDocuments,
) -> RepositoryResult<ConfigSnapshot> {
    let LoadedDefinitions {
        definitions,
        issues,
    } = loader.load(&documents)?;

    for issue in &issues {
        tracing::debug!(version, "Configuration issue: {}", issue);
    }

    Ok(ConfigSnapshot::new(
        version,
        documents.fingerprint,
        definitions,
        issues,
    ))
}
