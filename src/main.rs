//! Stagehand - dotenv-centric lifecycle tooling for remote secrets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stagehand::cli::output;
use stagehand::cli::{execute, Cli};
use stagehand::error::StagehandError;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("STAGEHAND_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("stagehand=debug")
        } else {
            EnvFilter::new("stagehand=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command) {
        // Format error with suggestion if available
        let suggestion = match &e {
            StagehandError::SecretNotFound(_) => {
                Some("check the secret id and the configured AWS region")
            }
            StagehandError::ConfirmationDeclined => Some("re-run and enter 'yes' to apply"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
