//! Move the current pointer back to a prior stage.

use crate::cli::confirm::StdinApproval;
use crate::cli::output;
use crate::core::store::AwsStore;
use crate::core::workflow::{self, RevertOutcome};
use crate::error::Result;

/// Run the revert workflow toward the version pinned by `stage`.
pub fn execute(secret_id: &str, stage: &str) -> Result<()> {
    let store = AwsStore::connect()?;
    let outcome = workflow::revert(&store, &StdinApproval, secret_id, stage)?;

    match outcome {
        RevertOutcome::AlreadyCurrent => {
            output::warn(&format!("{} already points at the current version", stage));
        }
        RevertOutcome::Reverted { version_id } => {
            output::success(&format!("current now points at version {}", version_id));
        }
    }
    Ok(())
}
