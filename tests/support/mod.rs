//! Test support utilities for stagehand integration tests.
//!
//! Provides an in-memory store double with a mutation log and a scripted
//! approval gate, so the workflows can be exercised without AWS.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use stagehand::core::constants::{CURRENT_LABEL, PREVIOUS_LABEL};
use stagehand::core::retention::{VersionLedger, VersionRecord};
use stagehand::core::store::{FetchedSecret, SecretStore};
use stagehand::core::workflow::Approval;
use stagehand::error::{Result, StagehandError};

/// One stored version inside [`MemoryStore`].
#[derive(Debug, Clone)]
struct StoredVersion {
    id: String,
    text: String,
    stages: Vec<String>,
}

struct Inner {
    versions: Vec<StoredVersion>,
    next_id: usize,
    log: Vec<String>,
    vanish_labels: HashSet<String>,
    fail_moves: bool,
}

/// In-memory store double holding a single secret.
///
/// Mirrors the label semantics of the real store: putting a version with
/// the current label demotes the old current version to the previous
/// label, and label moves are atomic. Every store call is appended to a
/// log so tests can assert call ordering.
pub struct MemoryStore {
    secret_id: String,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Empty store recognizing only `secret_id`.
    pub fn new(secret_id: &str) -> Self {
        Self {
            secret_id: secret_id.to_string(),
            inner: Mutex::new(Inner {
                versions: Vec::new(),
                next_id: 0,
                log: Vec::new(),
                vanish_labels: HashSet::new(),
                fail_moves: false,
            }),
        }
    }

    /// Store seeded with one version of `json` holding the current label.
    pub fn with_current(secret_id: &str, json: &str) -> Self {
        let store = Self::new(secret_id);
        store.seed_version(json, &[CURRENT_LABEL]);
        store
    }

    /// Seed a version directly, without logging. Returns its id.
    pub fn seed_version(&self, text: &str, stages: &[&str]) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("v{}", inner.next_id);
        inner.versions.push(StoredVersion {
            id: id.clone(),
            text: text.to_string(),
            stages: stages.iter().map(|s| s.to_string()).collect(),
        });
        id
    }

    /// Every store call so far, in order.
    pub fn log(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }

    /// Stage labels currently attached to `version_id`.
    pub fn stages_of(&self, version_id: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .versions
            .iter()
            .find(|v| v.id == version_id)
            .map(|v| v.stages.clone())
            .unwrap_or_default()
    }

    /// Id of the version carrying `stage`, if any.
    pub fn version_with_stage(&self, stage: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .versions
            .iter()
            .find(|v| v.stages.iter().any(|s| s == stage))
            .map(|v| v.id.clone())
    }

    /// Make `move_label` report `label` as absent, while listings still
    /// include it.
    pub fn vanish_label(&self, label: &str) {
        self.inner
            .lock()
            .unwrap()
            .vanish_labels
            .insert(label.to_string());
    }

    /// Make every subsequent `move_label` fail with a store error.
    pub fn fail_moves(&self) {
        self.inner.lock().unwrap().fail_moves = true;
    }

    fn check_id(&self, secret_id: &str) -> Result<()> {
        if secret_id == self.secret_id {
            Ok(())
        } else {
            Err(StagehandError::SecretNotFound(secret_id.to_string()))
        }
    }
}

impl SecretStore for MemoryStore {
    fn get_value(&self, secret_id: &str, stage: Option<&str>) -> Result<FetchedSecret> {
        self.check_id(secret_id)?;
        let inner = self.inner.lock().unwrap();

        let wanted = stage.unwrap_or(CURRENT_LABEL);
        inner
            .versions
            .iter()
            .find(|v| v.stages.iter().any(|s| s == wanted))
            .map(|v| FetchedSecret::new(v.id.clone(), v.text.clone()))
            .ok_or_else(|| match stage {
                Some(stage) => StagehandError::StageNotFound {
                    secret: secret_id.to_string(),
                    stage: stage.to_string(),
                },
                None => StagehandError::SecretNotFound(secret_id.to_string()),
            })
    }

    fn put_value(&self, secret_id: &str, text: &str, labels: &[String]) -> Result<String> {
        self.check_id(secret_id)?;
        let mut inner = self.inner.lock().unwrap();

        inner.next_id += 1;
        let id = format!("v{}", inner.next_id);
        inner.log.push(format!("put {}", id));

        let prev_current = inner
            .versions
            .iter()
            .position(|v| v.stages.iter().any(|s| s == CURRENT_LABEL));

        for version in &mut inner.versions {
            version.stages.retain(|s| !labels.contains(s));
        }

        // The old current version inherits the previous label.
        if labels.iter().any(|l| l == CURRENT_LABEL) {
            if let Some(idx) = prev_current {
                for version in &mut inner.versions {
                    version.stages.retain(|s| s != PREVIOUS_LABEL);
                }
                inner.versions[idx].stages.push(PREVIOUS_LABEL.to_string());
            }
        }

        inner.versions.push(StoredVersion {
            id: id.clone(),
            text: text.to_string(),
            stages: labels.to_vec(),
        });

        Ok(id)
    }

    fn list_versions(&self, secret_id: &str) -> Result<VersionLedger> {
        self.check_id(secret_id)?;
        let mut inner = self.inner.lock().unwrap();
        inner.log.push("list".to_string());

        let records = inner
            .versions
            .iter()
            .map(|v| VersionRecord::new(v.id.clone(), v.stages.clone()))
            .collect();
        Ok(VersionLedger::new(records))
    }

    fn move_label(
        &self,
        secret_id: &str,
        label: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<()> {
        self.check_id(secret_id)?;
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(format!(
            "move {} {} -> {}",
            label,
            from.unwrap_or("-"),
            to.unwrap_or("-")
        ));

        if inner.fail_moves {
            return Err(StagehandError::store("move_label", "injected failure"));
        }
        if inner.vanish_labels.contains(label) {
            return Err(StagehandError::StageNotFound {
                secret: secret_id.to_string(),
                stage: label.to_string(),
            });
        }

        if let Some(from) = from {
            let version = inner
                .versions
                .iter_mut()
                .find(|v| v.id == from && v.stages.iter().any(|s| s == label))
                .ok_or_else(|| StagehandError::StageNotFound {
                    secret: secret_id.to_string(),
                    stage: label.to_string(),
                })?;
            version.stages.retain(|s| s != label);
        }

        if let Some(to) = to {
            let version = inner
                .versions
                .iter_mut()
                .find(|v| v.id == to)
                .ok_or_else(|| StagehandError::StageNotFound {
                    secret: secret_id.to_string(),
                    stage: label.to_string(),
                })?;
            version.stages.push(label.to_string());
        }

        Ok(())
    }
}

/// Approval double with a fixed decision and a record of every rendered
/// diff it was shown.
pub struct ScriptedApproval {
    decision: bool,
    rendered: Mutex<Vec<String>>,
}

impl ScriptedApproval {
    /// Approves everything.
    pub fn approving() -> Self {
        Self {
            decision: true,
            rendered: Mutex::new(Vec::new()),
        }
    }

    /// Declines everything.
    pub fn declining() -> Self {
        Self {
            decision: false,
            rendered: Mutex::new(Vec::new()),
        }
    }

    /// Every diff presented so far, in order.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

impl Approval for ScriptedApproval {
    fn approve(&self, rendered: &str) -> Result<bool> {
        self.rendered.lock().unwrap().push(rendered.to_string());
        Ok(self.decision)
    }
}
