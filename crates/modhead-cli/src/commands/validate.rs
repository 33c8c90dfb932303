//! Edit-time validation of a profile file

use super::read_profiles;
use crate::error::{CliError, CliResult};
use crate::output::{self, print_error, print_success, OutputFormat};
use modhead_types::{Profile, ProfileList};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Table row for validation results
#[derive(Debug, Serialize, Tabled)]
struct ValidationRow {
    index: usize,
    id: String,
    name: String,
    valid: bool,
    status: String,
}

impl ValidationRow {
    fn new(index: usize, profile: &Profile) -> Self {
        let result = profile.validate();
        Self {
            index,
            id: profile.id.as_str().to_string(),
            name: profile.name.clone(),
            valid: result.is_ok(),
            status: match result {
                Ok(()) => "ok".to_string(),
                Err(e) => e.to_string(),
            },
        }
    }

    fn is_ok(&self) -> bool {
        self.valid
    }
}

fn validation_rows(profiles: &ProfileList) -> Vec<ValidationRow> {
    profiles
        .iter()
        .enumerate()
        .map(|(index, profile)| ValidationRow::new(index, profile))
        .collect()
}

/// Execute the validate command
pub async fn execute(file: &Path, format: OutputFormat) -> CliResult<()> {
    let profiles = read_profiles(file).await?;
    let rows = validation_rows(&profiles);
    let total = rows.len();
    let invalid = rows.iter().filter(|row| !row.is_ok()).count();

    output::print_output(rows, format)?;

    if invalid > 0 {
        if format == OutputFormat::Table {
            print_error(&format!("{} invalid profile(s)", invalid));
        }
        return Err(CliError::ValidationFailed { invalid, total });
    }

    if format == OutputFormat::Table {
        print_success(&format!("{} profile(s) valid", total));
    }
    Ok(())
}
