//! JSON file profile store
//!
//! The file holds the profile list as a JSON array, the same shape the
//! extension keeps under its `profiles` key. An object wrapping the array in
//! a `profiles` field is accepted on read.

use super::traits::ProfileStore;
use crate::error::{StorageError, StorageResult};
use crate::fsutil::{read_optional, write_atomic};
use async_trait::async_trait;
use modhead_types::{ProfileEdit, ProfileList};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::{watch, Mutex};

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredProfiles {
    List(ProfileList),
    Wrapped { profiles: ProfileList },
}

impl From<StoredProfiles> for ProfileList {
    fn from(stored: StoredProfiles) -> Self {
        match stored {
            StoredProfiles::List(profiles) | StoredProfiles::Wrapped { profiles } => profiles,
        }
    }
}

/// Profile store persisted to a JSON file
#[derive(Debug)]
pub struct JsonFileProfileStore {
    path: PathBuf,
    profiles: watch::Sender<ProfileList>,
    write_lock: Mutex<()>,
}

impl JsonFileProfileStore {
    /// Open the store, loading the file if it exists.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let profiles = read_profiles(&path).await?;
        tracing::debug!(path = %path.display(), count = profiles.len(), "Opened profile file");

        let (profiles, _) = watch::channel(profiles);
        Ok(Self {
            path,
            profiles,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, profiles: &ProfileList) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(profiles)?;
        write_atomic(&self.path, &bytes).await?;
        Ok(())
    }
}

async fn read_profiles(path: &Path) -> StorageResult<ProfileList> {
    let Some(bytes) = read_optional(path).await? else {
        return Ok(ProfileList::new());
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProfileList::new());
    }

    let stored: StoredProfiles =
        serde_json::from_slice(&bytes).map_err(|source| StorageError::InvalidData {
            path: path.display().to_string(),
            source,
        })?;
    let profiles = ProfileList::from(stored);
    profiles.check_unique_ids()?;
    Ok(profiles)
}

#[async_trait]
impl ProfileStore for JsonFileProfileStore {
    async fn load(&self) -> StorageResult<ProfileList> {
        Ok(self.profiles.borrow().clone())
    }

    async fn replace(&self, profiles: ProfileList) -> StorageResult<()> {
        profiles.check_unique_ids()?;
        let _guard = self.write_lock.lock().await;
        self.persist(&profiles).await?;
        self.profiles.send_replace(profiles);
        Ok(())
    }

    async fn apply(&self, edit: ProfileEdit) -> StorageResult<ProfileList> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.profiles.borrow().clone();
        profiles.apply(edit)?;
        self.persist(&profiles).await?;
        self.profiles.send_replace(profiles.clone());
        Ok(profiles)
    }

    fn subscribe(&self) -> watch::Receiver<ProfileList> {
        self.profiles.subscribe()
    }

    async fn refresh(&self) -> StorageResult<bool> {
        let _guard = self.write_lock.lock().await;
        let on_disk = read_profiles(&self.path).await?;

        let changed = self.profiles.send_if_modified(|current| {
            if *current == on_disk {
                false
            } else {
                *current = on_disk;
                true
            }
        });
        if changed {
            tracing::info!(path = %self.path.display(), "Profile file changed on disk");
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhead_types::Profile;

    fn sample() -> Profile {
        Profile::new("Staging", "staging\\.example\\.com")
            .with_id("p1")
            .with_header("X-Env", "staging")
    }

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileProfileStore::open(dir.path().join("profiles.json"))
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edits_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        let expected = sample();
        let store = JsonFileProfileStore::open(&path).await.unwrap();
        store.apply(ProfileEdit::Upsert(expected.clone())).await.unwrap();

        let reopened = JsonFileProfileStore::open(&path).await.unwrap();
        let profiles = reopened.load().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles.as_slice()[0], expected);
        assert_eq!(profiles.as_slice()[0].headers[0].id, expected.headers[0].id);

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(raw.is_array());
        assert_eq!(raw[0]["urlRegex"], "staging\\.example\\.com");
    }

    #[tokio::test]
    async fn test_wrapped_format_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        std::fs::write(
            &path,
            r#"{ "profiles": [ { "id": "1", "name": "n", "urlRegex": ".*", "headers": [], "enabled": false } ] }"#,
        )
        .unwrap();

        let store = JsonFileProfileStore::open(&path).await.unwrap();
        let profiles = store.load().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert!(!profiles.as_slice()[0].enabled);
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileProfileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_refresh_publishes_only_real_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let store = JsonFileProfileStore::open(&path).await.unwrap();
        let mut rx = store.subscribe();

        assert!(!store.refresh().await.unwrap());
        assert!(!rx.has_changed().unwrap());

        let list = ProfileList::from(vec![sample()]);
        std::fs::write(&path, serde_json::to_vec(&list).unwrap()).unwrap();

        assert!(store.refresh().await.unwrap());
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), list);

        assert!(!store.refresh().await.unwrap());
    }
}
