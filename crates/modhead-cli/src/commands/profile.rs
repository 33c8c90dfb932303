//! Profile file editing commands

use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, print_warning, OutputFormat};
use clap::Subcommand;
use modhead_daemon::storage::{JsonFileProfileStore, ProfileStore};
use modhead_types::{Profile, ProfileDraft, ProfileEdit, ProfileId, ProfileList};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Profile subcommands
#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// List profiles in precedence order
    List,

    /// Add a profile, or replace the one with the same id
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// URL pattern (defaults to every http/https URL)
        #[arg(short, long)]
        url_regex: Option<String>,

        /// Header as "Name: value"; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Profile id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Store the profile disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a profile
    #[command(alias = "rm")]
    Remove {
        /// Profile ID
        id: String,
    },

    /// Enable a profile
    Enable {
        /// Profile ID
        id: String,
    },

    /// Disable a profile
    Disable {
        /// Profile ID
        id: String,
    },

    /// Move a profile to a new position (0 is highest precedence)
    Move {
        /// Profile ID
        id: String,

        /// Target position
        to: usize,
    },
}

/// Table row for profile display
#[derive(Debug, Serialize, Tabled)]
struct ProfileRow {
    index: usize,
    id: String,
    name: String,
    url_regex: String,
    headers: usize,
    enabled: String,
    priority: usize,
}

fn profile_rows(profiles: &ProfileList) -> Vec<ProfileRow> {
    let total = profiles.len();
    profiles
        .iter()
        .enumerate()
        .map(|(index, profile)| ProfileRow {
            index,
            id: profile.id.as_str().to_string(),
            name: profile.name.clone(),
            url_regex: profile.url_regex.clone(),
            headers: profile.complete_headers().count(),
            enabled: if profile.enabled { "yes" } else { "no" }.to_string(),
            priority: total - index,
        })
        .collect()
}

/// Split a `Name: value` argument at the first colon.
pub(crate) fn parse_header(arg: &str) -> CliResult<(String, String)> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| CliError::InvalidHeader(arg.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidHeader(arg.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Execute a profile command against the profile file at `file`
pub async fn execute(command: ProfileCommands, file: &Path, format: OutputFormat) -> CliResult<()> {
    let store = JsonFileProfileStore::open(file).await?;

    match command {
        ProfileCommands::List => {
            let profiles = store.load().await?;
            output::print_output(profile_rows(&profiles), format)
        }

        ProfileCommands::Add {
            name,
            url_regex,
            headers,
            id,
            disabled,
        } => {
            let headers = headers
                .iter()
                .map(|arg| parse_header(arg))
                .collect::<CliResult<Vec<_>>>()?;
            let draft = ProfileDraft {
                id: id.map(ProfileId::new),
                name,
                url_regex,
                headers,
                enabled: Some(!disabled),
            };
            let profile: Profile = draft.into_profile()?;
            let id = profile.id.clone();
            let existed = store.load().await?.position(&id).is_some();

            store.apply(ProfileEdit::Upsert(profile)).await?;
            if existed {
                print_success(&format!("Updated profile {}", id.as_str()));
            } else {
                print_success(&format!("Added profile {}", id.as_str()));
            }
            Ok(())
        }

        ProfileCommands::Remove { id } => {
            let id = ProfileId::new(id);
            store.apply(ProfileEdit::Delete { id: id.clone() }).await?;
            print_success(&format!("Removed profile {}", id.as_str()));
            Ok(())
        }

        ProfileCommands::Enable { id } => set_enabled(&store, ProfileId::new(id), true).await,

        ProfileCommands::Disable { id } => set_enabled(&store, ProfileId::new(id), false).await,

        ProfileCommands::Move { id, to } => {
            let id = ProfileId::new(id);
            store
                .apply(ProfileEdit::Move {
                    id: id.clone(),
                    to,
                })
                .await?;
            print_success(&format!("Moved profile {} to position {}", id.as_str(), to));
            Ok(())
        }
    }
}

async fn set_enabled(store: &JsonFileProfileStore, id: ProfileId, enabled: bool) -> CliResult<()> {
    let before = store.load().await?;
    if before.get(&id).is_some_and(|p| p.enabled == enabled) {
        print_warning(&format!(
            "Profile {} is already {}",
            id.as_str(),
            if enabled { "enabled" } else { "disabled" }
        ));
        return Ok(());
    }

    store
        .apply(ProfileEdit::SetEnabled {
            id: id.clone(),
            enabled,
        })
        .await?;
    print_success(&format!(
        "{} profile {}",
        if enabled { "Enabled" } else { "Disabled" },
        id.as_str()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhead_types::Header;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Env: staging").unwrap(),
            ("X-Env".to_string(), "staging".to_string())
        );
        assert_eq!(
            parse_header("Authorization: Bearer a:b").unwrap(),
            ("Authorization".to_string(), "Bearer a:b".to_string())
        );
        assert!(matches!(
            parse_header("no-colon"),
            Err(CliError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_header(": value"),
            Err(CliError::InvalidHeader(_))
        ));
    }

    fn add(id: &str, header: &str) -> ProfileCommands {
        ProfileCommands::Add {
            name: id.to_uppercase(),
            url_regex: None,
            headers: vec![header.to_string()],
            id: Some(id.to_string()),
            disabled: false,
        }
    }

    async fn stored(path: &Path) -> ProfileList {
        JsonFileProfileStore::open(path).await.unwrap().load().await.unwrap()
    }

    #[tokio::test]
    async fn test_edit_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let format = OutputFormat::Table;

        execute(add("a", "X-A: 1"), &path, format).await.unwrap();
        execute(add("b", "X-B: 2"), &path, format).await.unwrap();
        execute(
            ProfileCommands::Move {
                id: "b".into(),
                to: 0,
            },
            &path,
            format,
        )
        .await
        .unwrap();
        execute(ProfileCommands::Disable { id: "a".into() }, &path, format)
            .await
            .unwrap();

        let profiles = stored(&path).await;
        let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!(profiles.as_slice()[0].enabled);
        assert!(!profiles.as_slice()[1].enabled);
        assert_eq!(profiles.as_slice()[0].url_regex, modhead_types::DEFAULT_URL_REGEX);

        // Re-adding an id replaces the profile in place.
        execute(add("a", "X-A: 3"), &path, format).await.unwrap();
        let profiles = stored(&path).await;
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles.as_slice()[1].headers[0].value, "3");

        execute(ProfileCommands::Remove { id: "b".into() }, &path, format)
            .await
            .unwrap();
        assert_eq!(stored(&path).await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_regex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        let err = execute(
            ProfileCommands::Add {
                name: "Broken".into(),
                url_regex: Some("([".into()),
                headers: vec!["X-A: 1".into()],
                id: None,
                disabled: false,
            },
            &path,
            OutputFormat::Table,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Profile(_)));
        assert!(stored(&path).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        let err = execute(
            ProfileCommands::Remove { id: "ghost".into() },
            &path,
            OutputFormat::Table,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Storage(_)));
    }

    #[test]
    fn test_rows_show_priority() {
        let profiles = ProfileList::from(vec![
            Profile::new("A", ".*").with_header("X-A", "1"),
            Profile {
                headers: vec![Header::new("X-B", "")],
                ..Profile::new("B", ".*")
            },
        ]);
        let rows = profile_rows(&profiles);
        assert_eq!(rows[0].priority, 2);
        assert_eq!(rows[1].priority, 1);
        assert_eq!(rows[1].headers, 0);
    }
}
