//! Error types for the modhead CLI

use modhead_daemon::error::{EngineError, StorageError};
use modhead_types::ProfileError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Profile file does not exist
    #[error("Profile file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// `--header` argument without a `:` separator
    #[error("Invalid header {0:?}: expected \"Name: value\"")]
    InvalidHeader(String),

    /// One or more profiles failed validation
    #[error("{invalid} of {total} profiles failed validation")]
    ValidationFailed { invalid: usize, total: usize },

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI commands
pub type CliResult<T> = Result<T, CliError>;
