//! Diff a dotenv file against the current value and write it on approval.

use std::path::Path;

use chrono::Utc;

use crate::cli::confirm::StdinApproval;
use crate::cli::output;
use crate::core::constants::ENV_FILE;
use crate::core::store::AwsStore;
use crate::core::workflow::{self, ChangeOutcome};
use crate::error::Result;

/// Run the change workflow against the file's contents.
pub fn execute(secret_id: &str, file: Option<&str>, keep: usize) -> Result<()> {
    let path = file.unwrap_or(ENV_FILE);

    let store = AwsStore::connect()?;
    let outcome = workflow::change(
        &store,
        &StdinApproval,
        secret_id,
        Path::new(path),
        keep,
        Utc::now(),
    )?;

    match outcome {
        ChangeOutcome::NoChanges => output::dimmed("no changes"),
        ChangeOutcome::Applied { version_id, pruned } => {
            output::success(&format!("wrote new version {}", version_id));
            if pruned > 0 {
                output::dimmed(&format!("stripped {} old version labels", pruned));
            }
        }
    }
    Ok(())
}
