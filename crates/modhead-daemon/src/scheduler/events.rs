//! Events emitted by the sync loop

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one compile-and-install round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Rules removed from the engine
    pub removed: usize,
    /// Rules installed in their place
    pub installed: usize,
    /// Profiles that produced no rule
    pub skipped: usize,
    pub completed_at: DateTime<Utc>,
}

/// Sync loop notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A full rule set replacement succeeded
    RulesInstalled(SyncReport),

    /// An install failed; the previous rule set is still in place
    InstallFailed {
        reason: String,
        attempt: u32,
        retry_in_ms: u64,
        at: DateTime<Utc>,
    },
}
