//! Secret lifecycle workflows.
//!
//! Orchestrates dump, change, and revert over the store trait. Each
//! workflow is a straight-line function: fetch, decide, confirm, mutate.
//! The only suspension point is [`Approval::approve`]; once it returns
//! `true` the store mutations run to completion or abort on first error.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::core::constants::CURRENT_LABEL;
use crate::core::diff::Diff;
use crate::core::dotenv;
use crate::core::retention::{mint_managed_label, select_prune_targets};
use crate::core::store::SecretStore;
use crate::core::value::SecretValue;
use crate::error::{Result, StagehandError};

/// Operator sign-off on a rendered diff.
///
/// Implementations may block indefinitely waiting for a human. Returning
/// `Ok(false)` declines; the workflows translate that into
/// `ConfirmationDeclined` before any store mutation happens.
pub trait Approval {
    /// Present the rendered diff and return whether to proceed.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the confirmation channel fails.
    fn approve(&self, rendered: &str) -> Result<bool>;
}

/// Outcome of a [`change`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Candidate and live value were equal; nothing was written.
    NoChanges,
    /// A new version was written as the current value.
    Applied {
        /// Id of the newly written version.
        version_id: String,
        /// Managed labels stripped by the pre-write retention sweep.
        pruned: usize,
    },
}

/// Outcome of a [`revert`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertOutcome {
    /// The requested stage already is the current version; nothing moved.
    AlreadyCurrent,
    /// The current pointer was moved to this version.
    Reverted {
        /// Id of the version now holding the current label.
        version_id: String,
    },
}

/// Write the current secret value to `path` as dotenv text.
///
/// Read-only against the store; no confirmation. The file is written with
/// mode 0600 on unix.
///
/// # Returns
///
/// The number of entries written.
///
/// # Errors
///
/// Returns a not-found error if the secret is absent, `Format` if the
/// stored payload is not a flat JSON object, or `Io` if the destination
/// cannot be written.
pub fn dump(store: &dyn SecretStore, secret_id: &str, path: &Path) -> Result<usize> {
    let fetched = store.get_value(secret_id, None)?;
    let value = SecretValue::from_json(fetched.text())?;

    write_env_file(path, &dotenv::encode(&value))?;

    info!(
        secret_id,
        path = %path.display(),
        entries = value.len(),
        "dumped secret to file"
    );
    Ok(value.len())
}

/// Replace the current secret value with the contents of a dotenv file.
///
/// Fetches the live value, decodes the candidate file, and diffs the two.
/// An empty diff short-circuits to [`ChangeOutcome::NoChanges`] without
/// touching the store. Otherwise the rendered diff goes to `approval`;
/// on approval a retention sweep runs against the pre-write version
/// listing, then the candidate is written as a new version carrying the
/// current label and a freshly minted managed label for `now`.
///
/// The sweep runs before the write so the new version is never a prune
/// candidate of its own run; a sweep failure aborts the write entirely.
///
/// # Errors
///
/// Returns `ConfirmationDeclined` if the operator does not approve,
/// `Format` on a malformed candidate file or stored payload, a not-found
/// error if the secret is absent, or `Store` on any store failure.
pub fn change(
    store: &dyn SecretStore,
    approval: &dyn Approval,
    secret_id: &str,
    path: &Path,
    keep_count: usize,
    now: DateTime<Utc>,
) -> Result<ChangeOutcome> {
    let live = store.get_value(secret_id, None)?;
    let live_value = SecretValue::from_json(live.text())?;

    let candidate_text = std::fs::read_to_string(path)?;
    let candidate = dotenv::decode(&candidate_text)?;

    let diff = Diff::compute(&live_value, &candidate);
    if diff.is_empty() {
        info!(secret_id, "candidate matches live value, nothing to write");
        return Ok(ChangeOutcome::NoChanges);
    }

    if !approval.approve(&diff.render())? {
        return Err(StagehandError::ConfirmationDeclined);
    }

    let pruned = sweep(store, secret_id, keep_count)?;

    let labels = vec![CURRENT_LABEL.to_string(), mint_managed_label(now)];
    let version_id = store.put_value(secret_id, &candidate.to_json(), &labels)?;

    info!(
        secret_id,
        version_id = %version_id,
        pruned,
        "wrote new current version"
    );
    Ok(ChangeOutcome::Applied { version_id, pruned })
}

/// Move the current label back to the version pinned by `stage`.
///
/// When the stage already resolves to the current version the workflow
/// returns [`RevertOutcome::AlreadyCurrent`] without prompting. Otherwise
/// the diff from live to target is rendered for approval; identical
/// values across distinct versions still prompt, with a warning. On
/// approval the current label moves in a single atomic store call. No
/// managed label is minted; the target keeps the labels it has.
///
/// # Errors
///
/// Returns `ConfirmationDeclined` if the operator does not approve, a
/// not-found error if the secret or stage is absent, or `Store` on any
/// store failure.
pub fn revert(
    store: &dyn SecretStore,
    approval: &dyn Approval,
    secret_id: &str,
    stage: &str,
) -> Result<RevertOutcome> {
    let current = store.get_value(secret_id, None)?;
    let target = store.get_value(secret_id, Some(stage))?;

    if current.version_id() == target.version_id() {
        info!(secret_id, stage, "stage already points at the current version");
        return Ok(RevertOutcome::AlreadyCurrent);
    }

    let live_value = SecretValue::from_json(current.text())?;
    let target_value = SecretValue::from_json(target.text())?;

    let diff = Diff::compute(&live_value, &target_value);
    if diff.is_empty() {
        warn!(secret_id, stage, "values are identical across the two versions");
    }

    if !approval.approve(&diff.render())? {
        return Err(StagehandError::ConfirmationDeclined);
    }

    store.move_label(
        secret_id,
        CURRENT_LABEL,
        Some(current.version_id()),
        Some(target.version_id()),
    )?;

    info!(
        secret_id,
        version_id = target.version_id(),
        "moved current label to reverted version"
    );
    Ok(RevertOutcome::Reverted {
        version_id: target.version_id().to_string(),
    })
}

/// Strip managed labels until at most `keep_count` candidates remain.
///
/// Operates on a fresh version listing. A label already gone by the time
/// its removal lands is skipped; any other failure aborts the sweep and
/// the surrounding write.
fn sweep(store: &dyn SecretStore, secret_id: &str, keep_count: usize) -> Result<usize> {
    let ledger = store.list_versions(secret_id)?;
    let targets = select_prune_targets(&ledger, keep_count);

    debug!(
        secret_id,
        versions = ledger.len(),
        targets = targets.len(),
        "retention sweep"
    );

    let mut pruned = 0;
    for target in &targets {
        match store.move_label(secret_id, target.label(), Some(target.version_id()), None) {
            Ok(()) => {
                debug!(
                    version_id = target.version_id(),
                    label = target.label(),
                    "stripped managed label"
                );
                pruned += 1;
            }
            Err(e) if e.is_not_found() => {
                debug!(
                    version_id = target.version_id(),
                    label = target.label(),
                    "label already absent, skipping"
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(pruned)
}

fn write_env_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
