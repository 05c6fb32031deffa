//! File system based configuration source

use async_trait::async_trait;
use aira_core::{SourceFingerprint, UnitStamp};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    config::{SourceConfig, SourceLayout},
    error::RepositoryError,
    traits::ConfigSource,
    RepositoryResult, SourceDocuments,
};

/// File system based configuration source
///
/// Expects the layout:
///
/// ```text
/// <root>/
///   questions/<category>.yaml
///   scoring_flexible.yaml
///   recommendations.yaml
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    /// Root path of the configuration
    root_path: PathBuf,
    layout: SourceLayout,
}

impl FileSystemSource {
    /// Create a new file system source with the default layout
    ///
    /// # Example
    /// ```no_run
    /// use aira_repository::FileSystemSource;
    ///
    /// let source = FileSystemSource::new("config").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(root_path: P) -> RepositoryResult<Self> {
        Self::with_layout(root_path, SourceLayout::default())
    }

    /// Create a new file system source with a custom file layout
    pub fn with_layout<P: AsRef<Path>>(root_path: P, layout: SourceLayout) -> RepositoryResult<Self> {
        let path = root_path.as_ref();

        if !path.is_dir() {
            return Err(RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let abs_path = path
            .absolutize()
            .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        Ok(Self {
            root_path: abs_path,
            layout,
        })
    }

    /// Create a source from a validated [`SourceConfig`]
    pub fn from_config(config: &SourceConfig) -> RepositoryResult<Self> {
        config
            .validate()
            .map_err(|e| RepositoryError::InvalidSource(e.to_string()))?;

        let base_path = config.base_path.as_deref().ok_or_else(|| {
            RepositoryError::InvalidSource("base_path required for FileSystem source".to_string())
        })?;

        Self::with_layout(base_path, config.layout.clone())
    }

    /// Get the root path of the source
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn questions_path(&self) -> PathBuf {
        self.root_path.join(&self.layout.questions_dir)
    }

    fn scoring_path(&self) -> PathBuf {
        self.root_path.join(&self.layout.scoring_file)
    }

    fn recommendations_path(&self) -> PathBuf {
        self.root_path.join(&self.layout.recommendations_file)
    }

    /// Question files as (category id, path), sorted by category id
    async fn question_files(&self) -> RepositoryResult<Vec<(String, PathBuf)>> {
        let dir = self.questions_path();
        if !fs::try_exists(&dir).await? {
            tracing::warn!("Questions directory not found: {}", dir.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_yaml = path
                .extension()
                .map_or(false, |ext| ext == "yaml" || ext == "yml");
            if !is_yaml {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((stem.to_string(), path.clone()));
            }
        }

        files.sort();
        Ok(files)
    }

    /// Unit name of a file, relative to the root
    fn unit_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root_path)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    async fn stamp(path: &Path) -> RepositoryResult<UnitStamp> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(UnitStamp::File {
                modified: metadata.modified().ok(),
                len: metadata.len(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UnitStamp::Missing),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_required(path: &Path) -> RepositoryResult<String> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(RepositoryError::NotFound {
                path: path.display().to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ConfigSource for FileSystemSource {
    async fn load_documents(&self) -> RepositoryResult<SourceDocuments> {
        let fingerprint = self.fingerprint().await?;

        let scoring = Self::read_required(&self.scoring_path()).await?;
        let mut documents = SourceDocuments::new(scoring).with_fingerprint(fingerprint);

        for (category, path) in self.question_files().await? {
            let content = Self::read_required(&path).await?;
            documents.add_questions(category, content);
        }

        let recommendations_path = self.recommendations_path();
        match fs::read_to_string(&recommendations_path).await {
            Ok(content) => documents.recommendations = Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "Recommendations file not found: {}",
                    recommendations_path.display()
                );
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(
            "Read {} documents from {}",
            documents.total_count(),
            self.root_path.display()
        );

        Ok(documents)
    }

    async fn fingerprint(&self) -> RepositoryResult<SourceFingerprint> {
        let mut fingerprint = SourceFingerprint::new();

        let scoring = self.scoring_path();
        fingerprint.insert(self.unit_name(&scoring), Self::stamp(&scoring).await?);

        let recommendations = self.recommendations_path();
        fingerprint.insert(
            self.unit_name(&recommendations),
            Self::stamp(&recommendations).await?,
        );

        for (_, path) in self.question_files().await? {
            fingerprint.insert(self.unit_name(&path), Self::stamp(&path).await?);
        }

        Ok(fingerprint)
    }

    fn describe(&self) -> String {
        format!("filesystem:{}", self.root_path.display())
    }
}
