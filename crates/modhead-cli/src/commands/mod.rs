//! CLI command implementations

pub mod compile;
pub mod explain;
pub mod profile;
pub mod validate;

use crate::error::{CliError, CliResult};
use modhead_daemon::storage::{JsonFileProfileStore, ProfileStore};
use modhead_types::ProfileList;
use std::path::Path;

/// Read a profile file that must already exist
pub(crate) async fn read_profiles(path: &Path) -> CliResult<ProfileList> {
    if !tokio::fs::try_exists(path).await? {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let store = JsonFileProfileStore::open(path).await?;
    Ok(store.load().await?)
}
