//! Profile storage for modhead-daemon
//!
//! Holds the ordered profile list and notifies watchers when it changes.

mod file;
mod memory;
mod traits;

pub use file::JsonFileProfileStore;
pub use memory::InMemoryProfileStore;
pub use traits::ProfileStore;

use crate::config::StorageConfig;
use crate::error::StorageResult;
use std::sync::Arc;

/// Build the store described by `config`
pub async fn open_store(config: &StorageConfig) -> StorageResult<Arc<dyn ProfileStore>> {
    let store: Arc<dyn ProfileStore> = match config {
        StorageConfig::Memory => Arc::new(InMemoryProfileStore::new()),
        StorageConfig::File { path } => Arc::new(JsonFileProfileStore::open(path).await?),
    };
    Ok(store)
}
