//! Interactive confirmation gate.
//!
//! Presents a rendered diff and reads the approval token from stdin. The
//! token must be the exact line `yes`; any other input, including EOF,
//! declines.

use std::io::{self, BufRead, Write};

use crate::cli::output;
use crate::core::workflow::Approval;
use crate::error::Result;

/// The literal token that approves a pending change.
pub const CONFIRM_TOKEN: &str = "yes";

/// Approval backed by the process stdin.
pub struct StdinApproval;

impl Approval for StdinApproval {
    fn approve(&self, rendered: &str) -> Result<bool> {
        if rendered.is_empty() {
            output::warn("values are identical");
        } else {
            output::diff_block(rendered);
        }

        print!("Enter '{}' to continue: ", CONFIRM_TOKEN);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        Ok(line == format!("{}\n", CONFIRM_TOKEN))
    }
}
