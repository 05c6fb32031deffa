//! CLI configuration

use aira_sdk::{EngineConfig, SourceConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration directory
pub const DEFAULT_REPOSITORY: &str = "config";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where questions, scoring and recommendations are read from
    #[serde(default = "default_repository")]
    pub repository: SourceConfig,

    /// Engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_repository() -> SourceConfig {
    SourceConfig::file_system(DEFAULT_REPOSITORY)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            engine: EngineConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/aira").required(false))
            .add_source(config::Environment::with_prefix("AIRA").separator("__"))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Point the file system source at `path`
    pub fn with_repository(mut self, path: &Path) -> Self {
        self.repository = SourceConfig::file_system(path.to_string_lossy())
            .with_layout(self.repository.layout);
        self
    }
}
