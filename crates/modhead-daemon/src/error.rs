//! Error types for modhead-daemon

use modhead_types::{ProfileError, RuleId};
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile store error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Rule engine error
    #[error("Rule engine error: {0}")]
    Engine(#[from] EngineError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Profile store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Edit or snapshot rejected by profile rules
    #[error("Invalid profiles: {0}")]
    Profile(#[from] ProfileError),

    /// Stored data could not be decoded
    #[error("Invalid data in {path}: {source}")]
    InvalidData {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rule engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule in the update was rejected; nothing was applied
    #[error("Invalid rule {rule_id}: {reason}")]
    InvalidRule { rule_id: RuleId, reason: String },

    /// The update would leave two rules with one id
    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(RuleId),

    /// The update would exceed the engine's rule capacity
    #[error("Rule quota exceeded: {requested} rules, limit {limit}")]
    QuotaExceeded { requested: usize, limit: usize },

    /// Encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

/// Result type alias for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
