//! modhead daemon library
//!
//! Glue between the profile store and the host rule engine:
//! - Profile storage backends with change notification
//! - Rule engine backends with all-or-nothing updates
//! - The sync loop that recompiles and reinstalls on every change
//! - Daemon lifecycle management

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod daemon;
pub mod engine;
pub mod error;
mod fsutil;
pub mod scheduler;
pub mod storage;

pub use config::DaemonConfig;
pub use daemon::Daemon;
pub use engine::{InMemoryRuleEngine, JsonFileRuleEngine, RuleEngine};
pub use error::{DaemonError, DaemonResult, EngineError, StorageError};
pub use scheduler::{RuleSyncer, SyncEvent, SyncReport};
pub use storage::{InMemoryProfileStore, JsonFileProfileStore, ProfileStore};
