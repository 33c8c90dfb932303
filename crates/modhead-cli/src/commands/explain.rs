//! Show how each profile compiles

use super::read_profiles;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use modhead_compiler::{compile, group_headers, header_strategy, skip_reason, HeaderStrategy};
use modhead_types::{Profile, ProfileList, Rule};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Table row for one profile
#[derive(Debug, Serialize, Tabled)]
struct ExplainRow {
    index: usize,
    name: String,
    priority: String,
    rule: String,
    headers: String,
}

fn strategy_label(strategy: HeaderStrategy) -> String {
    match strategy {
        HeaderStrategy::Native => "set + append".to_string(),
        HeaderStrategy::Merged { separator } => format!("merged with {:?}", separator),
    }
}

/// One line per header group, in the order the rule emits them.
fn header_lines(profile: &Profile) -> String {
    group_headers(profile.complete_headers())
        .iter()
        .map(|group| format!("{}: {}", group.name, strategy_label(header_strategy(group.name))))
        .collect::<Vec<_>>()
        .join("\n")
}

fn explain_rows(profiles: &ProfileList) -> Vec<ExplainRow> {
    let mut rules: std::vec::IntoIter<Rule> = compile(profiles).into_iter();

    profiles
        .iter()
        .enumerate()
        .map(|(index, profile)| {
            let (priority, rule) = match skip_reason(profile) {
                Some(reason) => ("-".to_string(), format!("skipped: {}", reason)),
                None => match rules.next() {
                    Some(rule) => (rule.priority.to_string(), rule.id.get().to_string()),
                    None => ("-".to_string(), "-".to_string()),
                },
            };
            ExplainRow {
                index,
                name: profile.name.clone(),
                priority,
                rule,
                headers: header_lines(profile),
            }
        })
        .collect()
}

/// Execute the explain command
pub async fn execute(file: &Path, format: OutputFormat) -> CliResult<()> {
    let profiles = read_profiles(file).await?;
    output::print_output(explain_rows(&profiles), format)
}
