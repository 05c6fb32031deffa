//! Configuration types for AssessmentEngine

use aira_repository::{StoreOptions, DEFAULT_LOAD_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SdkError};

/// Default polling interval for [`ConfigWatcher`](crate::ConfigWatcher)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bound on a single configuration load, in milliseconds
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,

    /// Change polling interval, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Default scale names tried before the others
    #[serde(default)]
    pub scale_priority: Vec<String>,

    /// Include Info-level diagnostics in every evaluation
    #[serde(default)]
    pub trace: bool,
}

fn default_load_timeout_ms() -> u64 {
    millis(DEFAULT_LOAD_TIMEOUT)
}

fn default_poll_interval_ms() -> u64 {
    millis(DEFAULT_POLL_INTERVAL)
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            load_timeout_ms: default_load_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            scale_priority: Vec::new(),
            trace: false,
        }
    }

    /// Set the load timeout
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout_ms = millis(timeout);
        self
    }

    /// Set the polling interval
    ///
    /// Sub-millisecond precision is dropped.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = millis(interval);
        self
    }

    /// Prefer a default scale during lookups
    pub fn with_scale_priority(mut self, scale: impl Into<String>) -> Self {
        self.scale_priority.push(scale.into());
        self
    }

    /// Enable tracing diagnostics
    pub fn enable_trace(mut self, enable: bool) -> Self {
        self.trace = enable;
        self
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.load_timeout_ms == 0 {
            return Err(SdkError::InvalidConfig(
                "load timeout must be at least 1ms".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(SdkError::InvalidConfig(
                "poll interval must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn store_options(&self) -> StoreOptions {
        StoreOptions {
            load_timeout: self.load_timeout(),
            scale_priority: self.scale_priority.clone(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
