//! Profile store trait definition

use crate::error::StorageResult;
use async_trait::async_trait;
use modhead_types::{ProfileEdit, ProfileList};
use tokio::sync::watch;

/// Holder of the ordered profile list.
///
/// Every successful write publishes the new list on the watch channel
/// returned by [`ProfileStore::subscribe`]. Watchers only ever see the most
/// recent snapshot, so bursts of edits collapse into one notification.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the current list
    async fn load(&self) -> StorageResult<ProfileList>;

    /// Replace the whole list
    async fn replace(&self, profiles: ProfileList) -> StorageResult<()>;

    /// Apply one edit and return the resulting list
    async fn apply(&self, edit: ProfileEdit) -> StorageResult<ProfileList>;

    /// Watch the list for changes
    fn subscribe(&self) -> watch::Receiver<ProfileList>;

    /// Re-read the backing medium, publishing if it changed underneath us.
    ///
    /// Returns whether a new snapshot was published.
    async fn refresh(&self) -> StorageResult<bool> {
        Ok(false)
    }
}
