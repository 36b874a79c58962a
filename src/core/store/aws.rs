//! AWS Secrets Manager store backend.
//!
//! Credentials come from the environment (AWS_ACCESS_KEY_ID, etc.) or the
//! default credential provider chain; the region likewise.

use tracing::trace;

use super::{FetchedSecret, SecretStore};
use crate::core::retention::{VersionLedger, VersionRecord};
use crate::error::{Result, StagehandError};

/// Page size for version listings, matching the store's maximum.
const LIST_VERSIONS_PAGE: i32 = 100;

/// AWS Secrets Manager client with a bounded, per-invocation lifetime.
///
/// The async SDK is bridged onto a current-thread runtime owned by this
/// value, so callers stay synchronous and no global client state exists.
pub struct AwsStore {
    client: aws_sdk_secretsmanager::Client,
    runtime: tokio::runtime::Runtime,
}

impl AwsStore {
    /// Connect using the default credential provider chain.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the runtime cannot be created.
    pub fn connect() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StagehandError::store("connect", e))?;

        let client = runtime.block_on(async {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            aws_sdk_secretsmanager::Client::new(&config)
        });

        Ok(Self { client, runtime })
    }
}

impl SecretStore for AwsStore {
    fn get_value(&self, secret_id: &str, stage: Option<&str>) -> Result<FetchedSecret> {
        trace!(secret_id, stage, "fetching secret value");

        self.runtime.block_on(async {
            let mut request = self.client.get_secret_value().secret_id(secret_id);
            if let Some(stage) = stage {
                request = request.version_stage(stage);
            }

            let output = request.send().await.map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    match stage {
                        Some(stage) => StagehandError::StageNotFound {
                            secret: secret_id.to_string(),
                            stage: stage.to_string(),
                        },
                        None => StagehandError::SecretNotFound(secret_id.to_string()),
                    }
                } else {
                    StagehandError::store("get_value", service_err)
                }
            })?;

            let version_id = output
                .version_id()
                .ok_or_else(|| StagehandError::store("get_value", "response missing version id"))?
                .to_string();
            let text = output
                .secret_string()
                .ok_or_else(|| {
                    StagehandError::store("get_value", "secret has no string payload")
                })?
                .to_string();

            trace!(version_id = %version_id, len = text.len(), "fetched secret value");
            Ok(FetchedSecret::new(version_id, text))
        })
    }

    fn put_value(&self, secret_id: &str, text: &str, labels: &[String]) -> Result<String> {
        trace!(secret_id, ?labels, len = text.len(), "writing new secret version");

        self.runtime.block_on(async {
            let mut request = self
                .client
                .put_secret_value()
                .secret_id(secret_id)
                .secret_string(text);
            for label in labels {
                request = request.version_stages(label);
            }

            let output = request.send().await.map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    StagehandError::SecretNotFound(secret_id.to_string())
                } else {
                    StagehandError::store("put_value", service_err)
                }
            })?;

            let version_id = output
                .version_id()
                .ok_or_else(|| StagehandError::store("put_value", "response missing version id"))?
                .to_string();

            trace!(version_id = %version_id, "wrote new secret version");
            Ok(version_id)
        })
    }

    fn list_versions(&self, secret_id: &str) -> Result<VersionLedger> {
        trace!(secret_id, "listing secret versions");

        self.runtime.block_on(async {
            let output = self
                .client
                .list_secret_version_ids()
                .secret_id(secret_id)
                .max_results(LIST_VERSIONS_PAGE)
                .send()
                .await
                .map_err(|e| {
                    let service_err = e.into_service_error();
                    if service_err.is_resource_not_found_exception() {
                        StagehandError::SecretNotFound(secret_id.to_string())
                    } else {
                        StagehandError::store("list_versions", service_err)
                    }
                })?;

            let records = output
                .versions()
                .iter()
                .filter_map(|entry| {
                    entry.version_id().map(|id| {
                        VersionRecord::new(id.to_string(), entry.version_stages().to_vec())
                    })
                })
                .collect();

            let ledger = VersionLedger::new(records);
            trace!(versions = ledger.len(), "listed secret versions");
            Ok(ledger)
        })
    }

    fn move_label(
        &self,
        secret_id: &str,
        label: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<()> {
        trace!(secret_id, label, from, to, "moving stage label");

        self.runtime.block_on(async {
            self.client
                .update_secret_version_stage()
                .secret_id(secret_id)
                .version_stage(label)
                .set_remove_from_version_id(from.map(String::from))
                .set_move_to_version_id(to.map(String::from))
                .send()
                .await
                .map_err(|e| {
                    let service_err = e.into_service_error();
                    if service_err.is_resource_not_found_exception() {
                        StagehandError::StageNotFound {
                            secret: secret_id.to_string(),
                            stage: label.to_string(),
                        }
                    } else {
                        StagehandError::store("move_label", service_err)
                    }
                })?;

            trace!(secret_id, label, "moved stage label");
            Ok(())
        })
    }
}
