//! Detector trait for injected quality checks.

use std::path::Path;

use super::{CheckName, CheckResult};

/// A quality check capability, constructed once and shared across runs.
///
/// Implementations wrap an external model. The core only relies on the
/// result schema of [`Detector::check`]'s kind.
pub trait Detector: Send + Sync {
    /// Which check this detector answers.
    fn check(&self) -> CheckName;

    /// Runs the detector on an image file.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector could not be invoked or produced no
    /// parseable result. The pipeline treats this as a malformed result.
    fn predict(&self, image: &Path) -> anyhow::Result<CheckResult>;
}
