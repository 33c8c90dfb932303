//! In-memory profile store

use super::traits::ProfileStore;
use crate::error::StorageResult;
use async_trait::async_trait;
use modhead_types::{ProfileEdit, ProfileList};
use tokio::sync::{watch, Mutex};

/// In-memory store for development and testing
#[derive(Debug)]
pub struct InMemoryProfileStore {
    profiles: watch::Sender<ProfileList>,
    write_lock: Mutex<()>,
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_profiles(ProfileList::new())
    }

    /// Create a store seeded with `profiles`
    pub fn with_profiles(profiles: ProfileList) -> Self {
        let (profiles, _) = watch::channel(profiles);
        Self {
            profiles,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self) -> StorageResult<ProfileList> {
        Ok(self.profiles.borrow().clone())
    }

    async fn replace(&self, profiles: ProfileList) -> StorageResult<()> {
        profiles.check_unique_ids()?;
        let _guard = self.write_lock.lock().await;
        self.profiles.send_replace(profiles);
        Ok(())
    }

    async fn apply(&self, edit: ProfileEdit) -> StorageResult<ProfileList> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.profiles.borrow().clone();
        profiles.apply(edit)?;
        self.profiles.send_replace(profiles.clone());
        Ok(profiles)
    }

    fn subscribe(&self) -> watch::Receiver<ProfileList> {
        self.profiles.subscribe()
    }
}
