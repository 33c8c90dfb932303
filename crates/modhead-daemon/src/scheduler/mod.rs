//! Rule sync loop and its events

mod events;
mod syncer;

pub use events::{SyncEvent, SyncReport};
pub use syncer::RuleSyncer;
