//! The quality decision and persistence pipeline.

use std::collections::BTreeSet;
use std::error::Error;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::path::Path;

use tempfile::TempPath;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::disposition::DispositionPolicy;
use crate::domain::{
    Assessment, AuditRecord, CheckName, CheckReport, CheckResult, Detector, Disposition,
    RunReport,
};
use crate::error::{ConfigError, PipelineError, StorageError};
use crate::gate::GatePolicy;
use crate::normalize::{display_confidence, display_result, normalize};
use crate::ports::{Clock, ImageSource, ProgressEvent, ProgressSink, ReportOutput};

/// Counts from a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images relocated into the results store.
    pub saved: usize,
    /// Images rejected by the gate (logged, not kept).
    pub rejected: usize,
    /// Images that could not be read.
    pub unreadable: usize,
    /// Runs whose outcome could not be persisted.
    pub not_persisted: usize,
}

impl BatchSummary {
    /// Runs that did not complete with a disposition.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.unreadable + self.not_persisted
    }
}

/// Runs the injected detectors on one image at a time, aggregates a verdict
/// and disposes of the image.
///
/// Detectors are constructed once by the caller and reused for every run.
pub struct QualityPipeline {
    detectors: Vec<Box<dyn Detector>>,
    gate: GatePolicy,
    disposition: DispositionPolicy,
    clock: Box<dyn Clock>,
}

impl QualityPipeline {
    /// Assembles a pipeline.
    ///
    /// Detectors are ordered by check so report and log columns are stable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateDetector`] if two detectors answer the
    /// same check and [`ConfigError::NotEnabled`] if the gate includes a check
    /// with no detector.
    pub fn new(
        mut detectors: Vec<Box<dyn Detector>>,
        gate: GatePolicy,
        disposition: DispositionPolicy,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        detectors.sort_by_key(|d| d.check());

        let mut available = BTreeSet::new();
        for detector in &detectors {
            if !available.insert(detector.check()) {
                return Err(ConfigError::DuplicateDetector(detector.check()));
            }
        }
        gate.validate_against(&available)?;

        Ok(Self {
            detectors,
            gate,
            disposition,
            clock,
        })
    }

    /// Checks run by this pipeline, in display order.
    pub fn checks(&self) -> impl Iterator<Item = CheckName> + '_ {
        self.detectors.iter().map(|d| d.check())
    }

    /// The inclusion policy.
    #[must_use]
    pub const fn gate(&self) -> &GatePolicy {
        &self.gate
    }

    /// Gates one image.
    ///
    /// The image is copied into a private working file first; the caller's
    /// file is never modified. The working file is either relocated into the
    /// results store or removed when this call returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Input`] if the image cannot be read and
    /// [`PipelineError::Storage`] if the outcome cannot be persisted. A `Bad`
    /// verdict is a successful run with a rejected disposition.
    pub fn run(&self, image: &Path) -> Result<RunReport, PipelineError> {
        let working = working_copy(image).map_err(|source| PipelineError::Input {
            path: image.to_path_buf(),
            source,
        })?;

        let at = self.clock.now();
        let assessment = self.assess(image, &working, at);
        let record = AuditRecord::from_assessment(at, &assessment);

        match self.disposition.dispose(&record, &working) {
            Ok(disposition) => Ok(RunReport::new(assessment, disposition)),
            Err(source) => {
                let source = match source {
                    StorageError::Relocation { dir, source, .. } => StorageError::Relocation {
                        image: image.to_path_buf(),
                        dir,
                        source,
                    },
                    other => other,
                };
                warn!("Could not persist outcome for {}: {source}", image.display());
                Err(PipelineError::Storage {
                    assessment: Box::new(assessment),
                    source,
                })
            }
        }
    }

    /// Gates every image of `source`, writing one report per assessed image.
    ///
    /// A failing image does not stop the batch. Runs whose outcome could not
    /// be persisted are still reported and completed, with a `not_persisted`
    /// disposition; only unreadable images emit `Failed`.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `output` fails.
    pub fn run_batch(
        &self,
        source: &dyn ImageSource,
        output: &dyn ReportOutput,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<BatchSummary> {
        let total = source.count_hint();
        let mut summary = BatchSummary::default();

        for (index, path) in source.images().enumerate() {
            let shown = path.display().to_string();
            progress.on_event(ProgressEvent::Started {
                path: shown.clone(),
                index,
                total,
            });

            match self.run(&path) {
                Ok(report) => {
                    if report.saved_path().is_some() {
                        summary.saved += 1;
                    } else {
                        summary.rejected += 1;
                    }
                    output.write(&report)?;
                    progress.on_event(ProgressEvent::Completed { report });
                }
                Err(PipelineError::Storage { assessment, source }) => {
                    summary.not_persisted += 1;
                    let report = RunReport::new(
                        *assessment,
                        Disposition::NotPersisted {
                            reason: error_chain(&source),
                        },
                    );
                    output.write(&report)?;
                    progress.on_event(ProgressEvent::Completed { report });
                }
                Err(e @ PipelineError::Input { .. }) => {
                    summary.unreadable += 1;
                    progress.on_event(ProgressEvent::Failed {
                        path: shown,
                        reason: error_chain(&e),
                    });
                }
            }
        }

        output.flush()?;
        progress.on_event(ProgressEvent::Finished {
            saved: summary.saved,
            rejected: summary.rejected,
            failed: summary.failed(),
        });

        Ok(summary)
    }

    fn assess(&self, source: &Path, working: &Path, at: OffsetDateTime) -> Assessment {
        let mut checks = Vec::with_capacity(self.detectors.len());
        let mut states = Vec::with_capacity(self.detectors.len());

        for detector in &self.detectors {
            let check = detector.check();
            let (raw, error) = match detector.predict(working) {
                Ok(raw) => (raw, None),
                Err(e) => {
                    warn!("Detector {check} failed for {}: {e:#}", source.display());
                    (CheckResult::empty(), Some(format!("{e:#}")))
                }
            };

            let state = normalize(check, &raw);
            debug!("{check}: {state:?} from {:?}", raw.fields());
            states.push((check, state));
            checks.push(CheckReport {
                check,
                label: check.label().to_string(),
                result: display_result(check, &raw),
                confidence: display_confidence(check, &raw),
                state,
                included: self.gate.includes(check),
                error,
            });
        }

        Assessment {
            source: source.display().to_string(),
            timestamp: at
                .format(&Rfc3339)
                .unwrap_or_else(|_| at.unix_timestamp().to_string()),
            checks,
            overall: self.gate.verdict(&states),
        }
    }
}

/// Renders an error and its sources as `outer: inner: ...`.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut next = error.source();
    while let Some(cause) = next {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        next = cause.source();
    }
    message
}

/// Copies `image` into a temporary file that is removed on drop. The
/// extension is kept so detectors and the results store see the same format.
fn working_copy(image: &Path) -> io::Result<TempPath> {
    let suffix = image
        .extension()
        .and_then(OsStr::to_str)
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    let mut source = File::open(image)?;
    let mut file = tempfile::Builder::new()
        .prefix("ocular-qa-")
        .suffix(&suffix)
        .tempfile()?;
    io::copy(&mut source, file.as_file_mut())?;
    fs::set_permissions(file.path(), source.metadata()?.permissions())?;
    file.as_file().sync_all()?;

    Ok(file.into_temp_path())
}
