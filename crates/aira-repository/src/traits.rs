//! Core trait definition for configuration sources
//!
//! A [`ConfigSource`] hands raw documents to the [`ConfigStore`](crate::ConfigStore)
//! and reports a cheap fingerprint so the store can tell whether a reload
//! is worthwhile.
//!
//! # Examples
//!
//! ```no_run
//! use aira_repository::{ConfigSource, FileSystemSource};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let source = FileSystemSource::new("config")?;
//!
//! let fingerprint = source.fingerprint().await?;
//! let documents = source.load_documents().await?;
//! println!("{} documents, {} units", documents.total_count(), fingerprint.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use aira_core::SourceFingerprint;

use crate::{RepositoryResult, SourceDocuments};

/// Source of configuration documents
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Read every document the configuration consists of
    ///
    /// The returned documents carry the fingerprint observed before reading,
    /// so a change racing with the read is picked up by the next check.
    async fn load_documents(&self) -> RepositoryResult<SourceDocuments>;

    /// Stamp every source unit without reading its content
    async fn fingerprint(&self) -> RepositoryResult<SourceFingerprint>;

    /// Human readable description, used in logs
    fn describe(&self) -> String;
}
