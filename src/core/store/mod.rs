//! Secret store access.
//!
//! Abstracts the versioned remote store behind a capability trait so the
//! workflows stay testable against an in-memory double.
//!
//! ## Adding a New Store Backend
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file (e.g. `vault.rs`)
//! 3. Re-export from this module

use crate::core::retention::VersionLedger;
use crate::error::Result;

mod aws;

pub use aws::AwsStore;

/// A secret payload fetched from the store.
#[derive(Debug, Clone)]
pub struct FetchedSecret {
    version_id: String,
    text: String,
}

impl FetchedSecret {
    /// Create a fetched secret from its version id and raw text.
    pub fn new(version_id: String, text: String) -> Self {
        Self { version_id, text }
    }

    /// The version this payload belongs to.
    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// The raw stored text (a JSON object for this tool).
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Capability surface of the versioned secret store.
///
/// Calls are strictly sequential; implementations are not required to
/// support pipelining, and callers never cache results across calls.
pub trait SecretStore {
    /// Fetch the value pinned to `stage`, or the current value when `None`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the secret or the requested stage is
    /// absent, or `Store` on any transport failure.
    fn get_value(&self, secret_id: &str, stage: Option<&str>) -> Result<FetchedSecret>;

    /// Create a new version carrying the given stage labels.
    ///
    /// # Returns
    ///
    /// The new version's id.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the version cannot be created.
    fn put_value(&self, secret_id: &str, text: &str, labels: &[String]) -> Result<String>;

    /// List all versions of the secret with their stage labels.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the secret is absent, or `Store` on
    /// any transport failure.
    fn list_versions(&self, secret_id: &str) -> Result<VersionLedger>;

    /// Atomically reassign or remove a single stage label.
    ///
    /// With both `from` and `to`, the label moves between versions in one
    /// store call; with only `from`, the label is removed. There is never a
    /// window in which the label exists on no version.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the label is not attached where
    /// expected, or `Store` on any transport failure.
    fn move_label(
        &self,
        secret_id: &str,
        label: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<()>;
}
