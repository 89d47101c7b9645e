//! Detectors run as external commands.
//!
//! The command receives the image path (appended, or substituted for an
//! `{image}` argument) and prints the raw result as a JSON object on stdout.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use ocular_qa_core::domain::{CheckName, CheckResult, Detector};
use serde_json::Value;
use tracing::debug;

/// Argument replaced by the image path.
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// Detector backed by an external program.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    check: CheckName,
    program: String,
    args: Vec<String>,
}

impl CommandDetector {
    /// Creates a detector for `check` from a command line.
    ///
    /// # Errors
    ///
    /// Returns an error if `command` is empty.
    pub fn new(check: CheckName, command: &[String]) -> Result<Self> {
        let Some((program, args)) = command.split_first() else {
            bail!("command for check '{check}' is empty");
        };
        Ok(Self {
            check,
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// The full command line, for display.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn arguments(&self, image: &Path) -> Vec<OsString> {
        let mut substituted = false;
        let mut args: Vec<OsString> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(IMAGE_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(IMAGE_PLACEHOLDER, &image.to_string_lossy()).into()
                } else {
                    arg.into()
                }
            })
            .collect();
        if !substituted {
            args.push(image.as_os_str().to_owned());
        }
        args
    }
}

impl Detector for CommandDetector {
    fn check(&self) -> CheckName {
        self.check
    }

    fn predict(&self, image: &Path) -> Result<CheckResult> {
        let output = Command::new(&self.program)
            .args(self.arguments(image))
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run `{}`", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("`{}` exited with {}: {}", self.program, output.status, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let value = parse_output(&stdout)
            .with_context(|| format!("`{}` did not print a JSON result", self.program))?;
        debug!("{} detector returned {value}", self.check);

        Ok(CheckResult::from_value(value))
    }
}

/// Parses the whole output as JSON, falling back to its last non-empty line
/// so detectors may print diagnostics before the result.
fn parse_output(stdout: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(stdout.trim()) {
        return Ok(value);
    }
    let last = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .context("no output")?;
    Ok(serde_json::from_str(last)?)
}
