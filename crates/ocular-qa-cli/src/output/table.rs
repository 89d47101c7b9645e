//! Human-readable table output.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use ocular_qa_core::{ReportOutput, RunReport};

/// Writes each report as a small results table followed by the verdict and
/// what happened to the image.
pub struct TableOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TableOutput {
    /// Creates a table output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a table output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

/// Renders one report.
fn render(report: &RunReport) -> String {
    let checks = &report.assessment.checks;
    let label_width = checks
        .iter()
        .map(|c| c.label.len())
        .chain(std::iter::once("Check".len()))
        .max()
        .unwrap_or_default();
    let result_width = checks
        .iter()
        .map(|c| c.result.len())
        .chain(std::iter::once("Result".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!("{}\n", report.assessment.source);
    out.push_str(&format!(
        "  {:label_width$}  {:result_width$}  Confidence\n",
        "Check", "Result"
    ));
    for check in checks {
        let excluded = if check.included { "" } else { "  (not in verdict)" };
        out.push_str(&format!(
            "  {:label_width$}  {:result_width$}  {:>10}{excluded}\n",
            check.label, check.result, check.confidence
        ));
    }
    out.push_str(&format!("  Overall Quality: {}\n", report.overall()));
    out.push_str(&format!("  {}\n", report.disposition.message()));
    out
}

impl ReportOutput for TableOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &RunReport) -> Result<()> {
        let text = render(report);
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{text}")?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ocular_qa_core::{
        Assessment, CheckName, CheckReport, Disposition, OverallQuality, QualityState,
    };

    use super::*;

    fn check(name: CheckName, result: &str, confidence: &str, included: bool) -> CheckReport {
        CheckReport {
            check: name,
            label: name.label().to_string(),
            result: result.to_string(),
            confidence: confidence.to_string(),
            state: QualityState::Good,
            included,
            error: None,
        }
    }

    #[test]
    fn test_render() {
        let report = RunReport::new(
            Assessment {
                source: "eye.jpg".to_string(),
                timestamp: "2024-03-05T14:07:09Z".to_string(),
                checks: vec![
                    check(CheckName::Presence, "Yes", "0.97", true),
                    check(CheckName::Focus, "Sharp", "0.80", false),
                    check(CheckName::Illumination, "Correct", "-", true),
                ],
                overall: OverallQuality::Good,
            },
            Disposition::Saved {
                path: PathBuf::from("saved_results/quality_results_20240305_140709.jpg"),
            },
        );

        let text = render(&report);

        assert!(text.starts_with("eye.jpg\n"));
        assert!(text.contains("  Eye Presence  Yes            0.97\n"));
        assert!(text.contains("Focus         Sharp          0.80  (not in verdict)"));
        assert!(text.contains("Illumination  Correct           -\n"));
        assert!(text.contains("Overall Quality: Good Quality"));
        assert!(text.contains(
            "Image saved successfully at `saved_results/quality_results_20240305_140709.jpg`"
        ));
    }
}
