//! Checks command - show each check, its detector and whether it votes.

use anyhow::Result;
use clap::Args;
use ocular_qa_core::{CheckKind, CheckName, GatePolicy};

use crate::config::AppConfig;

/// Arguments for the checks command.
#[derive(Args)]
pub struct ChecksArgs {
    /// Checks taking part in the verdict, comma-separated (overrides config)
    #[arg(long, value_name = "CHECKS", value_delimiter = ',')]
    pub include: Vec<String>,
}

/// Run the checks command.
///
/// # Errors
///
/// Returns an error for invalid check names.
pub fn run(args: &ChecksArgs, config: &AppConfig) -> Result<()> {
    let gate = if !args.include.is_empty() {
        GatePolicy::from_names(&args.include)?
    } else if let Some(ref names) = config.gate.included_checks {
        GatePolicy::from_names(names)?
    } else {
        GatePolicy::default()
    };
    let detectors = config.detectors()?;

    println!(
        "{:<14} {:<12} {:<8} DETECTOR",
        "CHECK", "KIND", "VERDICT"
    );
    for check in CheckName::ALL {
        let detector = detectors
            .iter()
            .find(|(c, _)| *c == check)
            .map_or_else(|| "(not configured)".to_string(), |(_, cmd)| cmd.join(" "));
        let verdict = if gate.includes(check) { "yes" } else { "no" };
        println!(
            "{:<14} {:<12} {verdict:<8} {detector}",
            check.as_str(),
            kind_name(check.kind())
        );
    }

    Ok(())
}

const fn kind_name(kind: CheckKind) -> &'static str {
    match kind {
        CheckKind::BinaryFlag { .. } => "binary-flag",
        CheckKind::Categorical { .. } => "categorical",
        CheckKind::TriState => "tri-state",
    }
}
