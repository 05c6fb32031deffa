//! Configuration store for the AIRA risk scoring engine
//!
//! This crate reads question, scoring and recommendation definitions from a
//! source, parses them into an immutable [`ConfigSnapshot`](aira_core::ConfigSnapshot)
//! and keeps the active snapshot behind a lock-free handle that reloads swap
//! atomically.
//!
//! # Features
//!
//! - **File System Source**: YAML files on disk (`questions/`, `scoring_flexible.yaml`,
//!   `recommendations.yaml`)
//! - **Memory Source**: In-memory documents for tests and embedding
//! - **Change Detection**: Per-unit fingerprints (mtime + length, or revision)
//! - **Validated Reloads**: A failed reload never replaces the active snapshot
//! - **Async API**: Non-blocking I/O operations with Tokio
//!
//! # Quick Start
//!
//! ```no_run
//! use aira_repository::{ConfigStore, FileSystemSource, StoreOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = Arc::new(FileSystemSource::new("config")?);
//!     let store = ConfigStore::open(source, StoreOptions::default()).await?;
//!
//!     for issue in store.validate().await {
//!         println!("{:?}: {}", issue.severity(), issue);
//!     }
//!
//!     let snapshot = store.current();
//!     println!("Serving configuration version {}", snapshot.version());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod file_system;
pub mod loader;
pub mod memory;
pub mod store;
pub mod traits;
pub mod validation;

// Re-export main types
pub use config::{SourceConfig, SourceConfigError, SourceKind, SourceLayout};
pub use content::SourceDocuments;
pub use error::{RepositoryError, RepositoryResult};
pub use file_system::FileSystemSource;
pub use loader::{DefinitionLoader, LoadedDefinitions};
pub use memory::MemorySource;
pub use store::{ConfigStore, StoreOptions, DEFAULT_LOAD_TIMEOUT};
pub use traits::ConfigSource;

use std::sync::Arc;

/// Build the source described by a [`SourceConfig`]
///
/// Only sources that read their own documents can be configured; a
/// [`MemorySource`] is populated by its owner and passed in directly.
pub fn source_from_config(config: &SourceConfig) -> RepositoryResult<Arc<dyn ConfigSource>> {
    config
        .validate()
        .map_err(|e| RepositoryError::InvalidSource(e.to_string()))?;

    match config.source {
        SourceKind::FileSystem => Ok(Arc::new(FileSystemSource::from_config(config)?)),
    }
}
