//! Batch progress on stderr.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use ocular_qa_core::{Disposition, ProgressEvent, ProgressSink, RunReport};

/// Progress reporting for a batch.
///
/// With a bar, the current image and the last verdict are shown as the bar
/// message. Without one, one status line is printed per image.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates the reporter. `quiet` silences everything, `show_bar` selects
    /// the bar over per-image lines.
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        let bar = (show_bar && !quiet).then(|| {
            let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
            {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, quiet }
    }

    fn line(&self, message: &str) {
        match &self.bar {
            Some(bar) => bar.println(message),
            None => eprintln!("{message}"),
        }
    }
}

/// One-line status for a finished run.
fn status(report: &RunReport) -> String {
    let source = &report.assessment.source;
    match &report.disposition {
        Disposition::Saved { path } => {
            format!("{source}: {} -> {}", report.overall(), path.display())
        }
        Disposition::Rejected { .. } => format!("{source}: {} (not saved)", report.overall()),
        Disposition::NotPersisted { reason } => format!("{source}: not persisted ({reason})"),
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { path, index, total } => {
                if let Some(bar) = &self.bar {
                    if let Some(t) = total {
                        bar.set_length(t as u64);
                    }
                    bar.set_position(index as u64);
                    bar.set_message(path);
                }
            }
            ProgressEvent::Completed { report } => match &self.bar {
                Some(bar) => {
                    if matches!(report.disposition, Disposition::NotPersisted { .. }) {
                        bar.println(format!("WARN: {}", status(&report)));
                    }
                    bar.set_message(report.overall().to_string());
                    bar.inc(1);
                }
                None => eprintln!("{}", status(&report)),
            },
            ProgressEvent::Failed { path, reason } => {
                self.line(&format!("WARN: {path}: {reason}"));
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
            }
            ProgressEvent::Finished {
                saved,
                rejected,
                failed,
            } => {
                let summary = format!("Done: {saved} saved, {rejected} rejected, {failed} failed");
                match &self.bar {
                    Some(bar) => bar.finish_with_message(summary),
                    None => eprintln!("{summary}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ocular_qa_core::{Assessment, OverallQuality};

    use super::*;

    fn report(overall: OverallQuality, disposition: Disposition) -> RunReport {
        RunReport::new(
            Assessment {
                source: "eye.jpg".to_string(),
                timestamp: "2024-03-05T14:07:09Z".to_string(),
                checks: vec![],
                overall,
            },
            disposition,
        )
    }

    #[test]
    fn test_status_lines() {
        let saved = report(
            OverallQuality::Usable,
            Disposition::Saved {
                path: PathBuf::from("out/quality_results_20240305_140709.jpg"),
            },
        );
        assert_eq!(
            status(&saved),
            "eye.jpg: Usable Quality -> out/quality_results_20240305_140709.jpg"
        );

        let rejected = report(OverallQuality::Bad, Disposition::rejected());
        assert_eq!(status(&rejected), "eye.jpg: Bad Quality (not saved)");

        let failed = report(
            OverallQuality::Good,
            Disposition::NotPersisted {
                reason: "disk full".to_string(),
            },
        );
        assert_eq!(status(&failed), "eye.jpg: not persisted (disk full)");
    }
}
