//! Download the current secret value to a dotenv file.

use std::path::Path;

use crate::cli::output;
use crate::core::constants::ENV_FILE;
use crate::core::store::AwsStore;
use crate::core::workflow;
use crate::error::Result;

/// Fetch the current value and write it to `file` as dotenv text.
///
/// Falls back to `.env` only when no file is given at all.
pub fn execute(secret_id: &str, file: Option<&str>) -> Result<()> {
    let path = file.unwrap_or(ENV_FILE);

    let store = AwsStore::connect()?;
    let entries = workflow::dump(&store, secret_id, Path::new(path))?;

    output::success(&format!(
        "wrote {} entries to {}",
        entries,
        output::path(path)
    ));
    Ok(())
}
