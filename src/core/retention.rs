//! Version retention policy.
//!
//! Decides which managed stage labels to strip so a secret's version
//! history stays bounded, without ever disturbing the store's own pointers.

use chrono::{DateTime, Utc};

use crate::core::constants::{CURRENT_LABEL, MANAGED_LABEL_PREFIX, PREVIOUS_LABEL};

/// One version of a secret as reported by the store.
#[derive(Debug, Clone)]
pub struct VersionRecord {
    version_id: String,
    stages: Vec<String>,
}

impl VersionRecord {
    /// Create a record from a version id and its stage labels.
    pub fn new(version_id: String, stages: Vec<String>) -> Self {
        Self { version_id, stages }
    }

    /// The store's opaque version id.
    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// All stage labels attached to this version.
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Whether a reserved label protects this version from pruning.
    pub fn is_protected(&self) -> bool {
        self.stages.iter().any(|s| is_reserved(s))
    }

    /// The single managed label, if this version carries exactly one.
    ///
    /// Versions with zero or several managed labels are never touched.
    pub fn managed_label(&self) -> Option<&str> {
        let mut managed = self.stages.iter().filter(|s| is_managed(s));
        match (managed.next(), managed.next()) {
            (Some(label), None) => Some(label),
            _ => None,
        }
    }
}

/// Snapshot of all versions of one secret at a point in time.
///
/// Not persisted; re-fetched from the store before each retention decision.
#[derive(Debug, Clone, Default)]
pub struct VersionLedger {
    records: Vec<VersionRecord>,
}

impl VersionLedger {
    /// Create a ledger from the store's version listing.
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self { records }
    }

    /// All version records.
    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    /// Number of versions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger has no versions.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A managed label slated for removal from a specific version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneTarget {
    version_id: String,
    label: String,
}

impl PruneTarget {
    /// The version the label is removed from.
    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// The managed label to remove.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Whether a stage label is one of the store's own pointers.
pub fn is_reserved(stage: &str) -> bool {
    stage == CURRENT_LABEL || stage == PREVIOUS_LABEL
}

/// Whether a stage label is minted and owned by stagehand.
pub fn is_managed(stage: &str) -> bool {
    stage.starts_with(MANAGED_LABEL_PREFIX)
}

/// Mint a managed label for a version created at `now`.
///
/// The timestamp is UTC `%Y%m%d%H%M%S`, always exactly 14 digits, so the
/// lexicographic order of managed labels equals their chronological order.
/// The retention sort relies on this width staying fixed.
pub fn mint_managed_label(now: DateTime<Utc>) -> String {
    format!("{}{}", MANAGED_LABEL_PREFIX, now.format("%Y%m%d%H%M%S"))
}

/// Select the managed labels to strip so at most `keep_count` candidate
/// versions remain.
///
/// A candidate carries exactly one managed label and no reserved label;
/// reserved status always wins, so a version holding both a managed and a
/// reserved label is protected. Unlabeled and foreign-labeled versions are
/// never touched.
///
/// Returns the oldest `candidates - keep_count` targets, oldest first, or
/// nothing when the candidate count is within the budget. The caller
/// removes only the managed label from each target, never the version
/// itself and never a reserved label.
pub fn select_prune_targets(ledger: &VersionLedger, keep_count: usize) -> Vec<PruneTarget> {
    let mut candidates: Vec<(&str, &str)> = Vec::new();

    for record in ledger.records() {
        if record.is_protected() {
            continue;
        }
        if let Some(label) = record.managed_label() {
            candidates.push((label, record.version_id()));
        }
    }

    if candidates.len() <= keep_count {
        return Vec::new();
    }

    // Fixed-width timestamps make lexicographic order chronological.
    candidates.sort_by(|a, b| a.0.cmp(b.0));

    candidates[..candidates.len() - keep_count]
        .iter()
        .map(|(label, id)| PruneTarget {
            version_id: id.to_string(),
            label: label.to_string(),
        })
        .collect()
}
