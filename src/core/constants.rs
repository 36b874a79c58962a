//! Constants used throughout stagehand.
//!
//! Centralizes magic strings and configuration values.

/// Default dotenv file name used when no path is supplied (.env).
pub const ENV_FILE: &str = ".env";

/// Reserved label the store keeps on the live version.
pub const CURRENT_LABEL: &str = "AWSCURRENT";

/// Reserved label the store keeps on the immediately prior version.
pub const PREVIOUS_LABEL: &str = "AWSPREVIOUS";

/// Prefix of the managed labels stagehand mints and owns.
///
/// The full label is the prefix followed by a fixed-width UTC timestamp,
/// see [`crate::core::retention::mint_managed_label`].
pub const MANAGED_LABEL_PREFIX: &str = "VERSION_";

/// How many managed versions survive a retention sweep by default.
pub const DEFAULT_KEEP_COUNT: usize = 12;
