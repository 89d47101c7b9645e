//! Report output port for writing run reports.

use crate::domain::RunReport;

/// Port for outputting run reports.
pub trait ReportOutput: Send + Sync {
    /// Writes a single run report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, report: &RunReport) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
