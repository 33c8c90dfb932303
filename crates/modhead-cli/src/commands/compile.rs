//! Compile a profile file into rule JSON

use super::read_profiles;
use crate::error::CliResult;
use crate::output::{print_json, print_success};
use clap::Args;
use modhead_compiler::compile_with_summary;
use modhead_daemon::config::DEFAULT_MAX_RULES;
use modhead_daemon::engine::{JsonFileRuleEngine, RuleEngine};
use std::path::PathBuf;

/// Arguments for `modhead compile`
#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Profile file (JSON array of profiles)
    pub file: PathBuf,

    /// Pretty-print the rule JSON
    #[arg(long)]
    pub pretty: bool,

    /// Install the rules into this rule file instead of printing them
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Rule capacity enforced when installing into `--out`
    #[arg(long, default_value_t = DEFAULT_MAX_RULES)]
    pub max_rules: usize,
}

/// Execute the compile command
pub async fn execute(args: CompileArgs) -> CliResult<()> {
    let profiles = read_profiles(&args.file).await?;
    let summary = compile_with_summary(&profiles);

    for skipped in &summary.skipped {
        tracing::info!(
            index = skipped.index,
            profile = %skipped.profile_id,
            reason = %skipped.reason,
            "Profile skipped"
        );
    }

    match args.out {
        Some(path) => {
            let engine = JsonFileRuleEngine::open(&path, args.max_rules).await?;
            let installed = engine.installed_rule_ids().await?;
            let count = summary.rules.len();
            engine.update_rules(&installed, summary.rules).await?;
            print_success(&format!("Installed {} rules into {}", count, path.display()));
            Ok(())
        }
        None => print_json(&summary.rules, args.pretty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhead_types::{Profile, ProfileList, Rule};

    #[tokio::test]
    async fn test_compile_installs_into_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_path = dir.path().join("profiles.json");
        let rules_path = dir.path().join("rules.json");

        let profiles = ProfileList::from(vec![
            Profile::new("A", "^https://a\\.test/").with_header("X-A", "1"),
            Profile::new("Off", ".*")
                .with_header("X-Off", "1")
                .with_enabled(false),
            Profile::new("B", "^https://b\\.test/").with_header("X-B", "2"),
        ]);
        std::fs::write(&profiles_path, serde_json::to_vec(&profiles).unwrap()).unwrap();

        execute(CompileArgs {
            file: profiles_path,
            pretty: false,
            out: Some(rules_path.clone()),
            max_rules: 10,
        })
        .await
        .unwrap();

        let rules: Vec<Rule> =
            serde_json::from_slice(&std::fs::read(&rules_path).unwrap()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].priority, 3);
        assert_eq!(rules[1].priority, 1);
    }

    #[tokio::test]
    async fn test_compile_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(CompileArgs {
            file: dir.path().join("absent.json"),
            pretty: false,
            out: None,
            max_rules: 10,
        })
        .await
        .unwrap_err();
        assert!(matches!(err, crate::error::CliError::FileNotFound(_)));
    }
}
