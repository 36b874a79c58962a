//! Structural diff between two secret values.
//!
//! The rendered report is what the operator approves, so computing and
//! rendering are pure functions: identical inputs always produce an
//! identical report, and nothing may mutate the candidate between render
//! and write.

use crate::core::value::SecretValue;

/// How a single key changed between the two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Key present only in the candidate.
    Added(String),
    /// Key present only in the live value.
    Removed(String),
    /// Key present in both with differing values.
    Updated { old: String, new: String },
}

/// A single changed key in a diff.
#[derive(Debug, Clone)]
pub struct DiffEntry {
    key: String,
    change: Change,
}

impl DiffEntry {
    /// The changed key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The change for this key.
    pub fn change(&self) -> &Change {
        &self.change
    }
}

/// The full structural delta between two secret values.
///
/// Empty iff the two values are equal as ordered mappings: a pure
/// reordering of otherwise identical pairs is recorded as a change.
#[derive(Debug)]
pub struct Diff {
    entries: Vec<DiffEntry>,
    reorder: Option<(Vec<String>, Vec<String>)>,
}

impl Diff {
    /// Compute the diff from live value `a` to candidate `b`.
    ///
    /// Keys present only in `a` are removals, keys only in `b` are
    /// additions, keys in both with differing values are updates. Entries
    /// are sorted by key, lexicographic.
    pub fn compute(a: &SecretValue, b: &SecretValue) -> Self {
        let mut entries = Vec::new();

        for (key, old) in a.iter() {
            match b.get(key) {
                None => entries.push(DiffEntry {
                    key: key.to_string(),
                    change: Change::Removed(old.to_string()),
                }),
                Some(new) if new != old => entries.push(DiffEntry {
                    key: key.to_string(),
                    change: Change::Updated {
                        old: old.to_string(),
                        new: new.to_string(),
                    },
                }),
                Some(_) => {}
            }
        }

        for (key, new) in b.iter() {
            if a.get(key).is_none() {
                entries.push(DiffEntry {
                    key: key.to_string(),
                    change: Change::Added(new.to_string()),
                });
            }
        }

        // Sort by key for deterministic output.
        entries.sort_by(|x, y| x.key.cmp(&y.key));

        // Identical pairs in a different order are still a value change.
        let reorder = if entries.is_empty() && !a.keys().eq(b.keys()) {
            Some((
                a.keys().map(str::to_string).collect(),
                b.keys().map(str::to_string).collect(),
            ))
        } else {
            None
        };

        Self { entries, reorder }
    }

    /// Changed keys, sorted lexicographically.
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Whether the two values are equal as ordered mappings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.reorder.is_none()
    }

    /// Render the human-readable report the operator approves.
    ///
    /// Removals and the old side of updates render as `- key=value` lines,
    /// additions and the new side as `+ key=value` lines; a pure reorder
    /// renders a single `~ key order:` line. Returns the empty string iff
    /// the diff is empty.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for entry in &self.entries {
            match &entry.change {
                Change::Removed(old) => {
                    out.push_str(&format!("- {}={}\n", entry.key, old));
                }
                Change::Added(new) => {
                    out.push_str(&format!("+ {}={}\n", entry.key, new));
                }
                Change::Updated { old, new } => {
                    out.push_str(&format!("- {}={}\n", entry.key, old));
                    out.push_str(&format!("+ {}={}\n", entry.key, new));
                }
            }
        }

        if let Some((from, to)) = &self.reorder {
            out.push_str(&format!(
                "~ key order: {} -> {}\n",
                from.join(", "),
                to.join(", ")
            ));
        }

        out
    }
}
