//! Stagehand - dotenv-centric lifecycle tooling for remote secrets.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── dump          # Download the current value to a dotenv file
//! │   ├── change        # Diff a file against the store and write it
//! │   ├── revert        # Move the current pointer to a prior stage
//! │   ├── confirm       # Stdin approval gate
//! │   └── output        # Shared terminal output helpers
//! └── core/             # Core library components
//!     ├── value         # Ordered key-value secret payload
//!     ├── dotenv        # key=value text codec
//!     ├── diff          # Structural diff + rendered report
//!     ├── retention     # Managed-label pruning policy
//!     ├── store/        # Versioned secret store
//!     │   ├── mod       # Store trait
//!     │   └── aws       # AWS Secrets Manager backend
//!     └── workflow      # dump/change/revert orchestration
//! ```
//!
//! # Features
//!
//! - Lossless, order-preserving dotenv ↔ JSON conversion
//! - Every change gated on an operator-approved diff
//! - Bounded version history via managed stage labels
//! - Atomic revert through a single label move

pub mod cli;
pub mod core;
pub mod error;
