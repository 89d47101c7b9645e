//! Progress reporting port for UI integration.

use crate::domain::RunReport;

/// Events emitted during a batch for progress tracking.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A run started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// A run produced a report: saved, rejected or not persisted.
    Completed {
        /// The run report.
        report: RunReport,
    },
    /// The image could not be read; nothing was assessed.
    Failed {
        /// Path to the image.
        path: String,
        /// Failure description.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Images retained.
        saved: usize,
        /// Images rejected by the gate.
        rejected: usize,
        /// Runs that failed.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
