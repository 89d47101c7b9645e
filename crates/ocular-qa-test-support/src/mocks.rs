//! Mock implementations of core port traits.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ocular_qa_core::domain::{AuditRecord, CheckName, CheckResult, Detector, RunReport};
use ocular_qa_core::error::StorageError;
use ocular_qa_core::ports::{
    AuditLog, Clock, ImageSource, ProgressEvent, ProgressSink, ReportOutput, ResultsStore,
};
use time::OffsetDateTime;

/// Mock implementation of `Detector` for testing.
///
/// Returns a fixed result (or a fixed failure) and records the paths it was
/// called with. Clones share the call log.
#[derive(Clone)]
pub struct MockDetector {
    check: CheckName,
    outcome: Result<CheckResult, String>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockDetector {
    /// Creates a detector that always returns `result`.
    #[must_use]
    pub fn returning(check: CheckName, result: CheckResult) -> Self {
        Self {
            check,
            outcome: Ok(result),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a detector that always fails with `message`.
    #[must_use]
    pub fn failing(check: CheckName, message: &str) -> Self {
        Self {
            check,
            outcome: Err(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Paths passed to `predict`, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Boxes the detector for injection into a pipeline.
    #[must_use]
    pub fn boxed(self) -> Box<dyn Detector> {
        Box::new(self)
    }
}

impl Detector for MockDetector {
    fn check(&self) -> CheckName {
        self.check
    }

    fn predict(&self, image: &Path) -> anyhow::Result<CheckResult> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(image.to_path_buf());
        self.outcome.clone().map_err(anyhow::Error::msg)
    }
}

/// Mock implementation of `AuditLog` for testing.
///
/// Captures records for later assertions. Clones share the captured records.
#[derive(Clone, Default)]
pub struct MockAuditLog {
    records: Arc<Mutex<Vec<AuditRecord>>>,
    fail: bool,
}

impl MockAuditLog {
    /// Creates a new mock log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log whose appends always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditLog for MockAuditLog {
    fn append(&self, record: &AuditRecord) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::AuditLog {
                path: PathBuf::from("mock://results_log.csv"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

/// Mock implementation of `ResultsStore` for testing.
///
/// Records retained images under a virtual directory without touching the
/// filesystem. Clones share the retained list.
#[derive(Clone, Default)]
pub struct MockResultsStore {
    retained: Arc<Mutex<Vec<(PathBuf, OffsetDateTime)>>>,
    fail: bool,
}

impl MockResultsStore {
    /// Virtual directory retained paths are reported under.
    pub const DIR: &'static str = "mock://saved_results";

    /// Creates a new mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose relocations always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Images retained so far with the timestamp they were retained at.
    #[must_use]
    pub fn retained(&self) -> Vec<(PathBuf, OffsetDateTime)> {
        self.retained
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResultsStore for MockResultsStore {
    fn retain(&self, image: &Path, at: OffsetDateTime) -> Result<PathBuf, StorageError> {
        if self.fail {
            return Err(StorageError::Relocation {
                image: image.to_path_buf(),
                dir: PathBuf::from(Self::DIR),
                source: std::io::Error::other("disk full"),
            });
        }
        let mut retained = self.retained.lock().unwrap_or_else(PoisonError::into_inner);
        let dest = PathBuf::from(Self::DIR).join(format!("retained_{}", retained.len()));
        retained.push((image.to_path_buf(), at));
        Ok(dest)
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-set paths and tracks iteration for assertions.
pub struct MockImageSource {
    paths: Vec<PathBuf>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given paths.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = PathBuf> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.paths.iter().cloned())
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.paths.len())
    }
}

/// Mock implementation of `ReportOutput` for testing.
///
/// Captures reports for later assertions.
#[derive(Default)]
pub struct MockReportOutput {
    reports: Arc<Mutex<Vec<RunReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockReportOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<RunReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReportOutput for MockReportOutput {
    fn write(&self, report: &RunReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished {
                saved,
                rejected,
                failed,
            } => Some((*saved, *rejected, *failed)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
