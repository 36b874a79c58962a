//! Command-line interface.

pub mod change;
pub mod confirm;
pub mod dump;
pub mod output;
pub mod revert;

use clap::{Parser, Subcommand};

use crate::core::constants::{DEFAULT_KEEP_COUNT, PREVIOUS_LABEL};

/// Stagehand - dotenv-centric lifecycle tooling for remote secrets.
#[derive(Parser)]
#[command(
    name = "stagehand",
    about = "Dump, diff-and-change, and revert dotenv secrets in a versioned store",
    version
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Download the current secret value to a dotenv file
    Dump {
        /// Secret id in the store
        secret_id: String,
        /// Destination file (defaults to .env)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Diff a dotenv file against the current value and write it on approval
    Change {
        /// Secret id in the store
        secret_id: String,
        /// Candidate file (defaults to .env)
        #[arg(short, long)]
        file: Option<String>,
        /// How many labeled versions to keep after the retention sweep
        #[arg(long, env = "STAGEHAND_KEEP", default_value_t = DEFAULT_KEEP_COUNT)]
        keep: usize,
    },

    /// Move the current pointer back to a prior stage
    Revert {
        /// Secret id in the store
        secret_id: String,
        /// Stage label to revert to
        #[arg(long, default_value = PREVIOUS_LABEL)]
        stage: String,
    },
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Dump { secret_id, file } => dump::execute(&secret_id, file.as_deref()),
        Change {
            secret_id,
            file,
            keep,
        } => change::execute(&secret_id, file.as_deref(), keep),
        Revert { secret_id, stage } => revert::execute(&secret_id, &stage),
    }
}
