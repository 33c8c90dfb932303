//! Configuration for modhead-daemon

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Dynamic rule capacity of the common host engines
pub const DEFAULT_MAX_RULES: usize = 5000;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Where profiles are kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Where compiled rules are installed
    #[serde(default)]
    pub engine: EngineConfig,

    /// Sync loop configuration
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Profile storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (for development/testing)
    #[default]
    Memory,

    /// JSON file holding the profile array
    File {
        /// Path to the profile file
        path: PathBuf,
    },
}

/// Rule engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineConfig {
    /// Rules kept in memory
    Memory {
        #[serde(default = "default_max_rules")]
        max_rules: usize,
    },

    /// Rules written to a JSON file for a browser-side loader
    File {
        /// Output path
        path: PathBuf,

        #[serde(default = "default_max_rules")]
        max_rules: usize,
    },
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::Memory {
            max_rules: DEFAULT_MAX_RULES,
        }
    }
}

/// Sync loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// How often the store is re-read for outside edits; 0 disables polling
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// First retry delay after a failed install
    #[serde(default = "default_retry_initial")]
    pub retry_initial_ms: u64,

    /// Upper bound for the retry delay
    #[serde(default = "default_retry_max")]
    pub retry_max_ms: u64,

    /// Capacity of the sync event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            retry_initial_ms: default_retry_initial(),
            retry_max_ms: default_retry_max(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl SyncConfig {
    /// Delay before retry number `attempt` (1-based), doubling up to the cap.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let ms = self
            .retry_initial_ms
            .saturating_mul(factor)
            .min(self.retry_max_ms);
        Duration::from_millis(ms)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_max_rules() -> usize {
    DEFAULT_MAX_RULES
}

fn default_poll_interval() -> u64 {
    2
}

fn default_retry_initial() -> u64 {
    500
}

fn default_retry_max() -> u64 {
    30_000
}

fn default_event_buffer() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `MODHEAD__*` environment variables (e.g. `MODHEAD__SYNC__RETRY_MAX_MS`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("MODHEAD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
