//! CLI command definitions and handlers.

pub mod check;
pub mod checks;

use clap::{Parser, Subcommand};

/// Ocular QA - Quality gate for ocular photographs
#[derive(Parser)]
#[command(name = "ocular-qa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared check arguments (paths, storage, output).
    #[command(flatten)]
    pub check: check::CheckArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Gate images: log every result, keep only usable images
    Check(check::CheckArgs),
    /// List checks, their detectors and whether they vote
    Checks(checks::ChecksArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image was retained.
    Success = 0,
    /// At least one image was rejected by the gate.
    Rejected = 1,
    /// Usage or configuration error, or an unreadable image.
    Error = 2,
    /// At least one outcome could not be persisted.
    StorageFailure = 3,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
