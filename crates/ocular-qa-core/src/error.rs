//! Error types for the quality gate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Assessment, CheckName};

/// Invalid gate configuration. Raised while building the pipeline, before
/// any image is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A check name that is not one of the known checks.
    #[error(
        "unknown check '{0}' (expected one of: presence, focus, illumination, reflection, \
         completeness, resolution)"
    )]
    UnknownCheck(String),

    /// The inclusion list is empty.
    #[error("included_checks must name at least one check")]
    EmptyInclusion,

    /// The inclusion list names a check twice.
    #[error("check '{0}' is listed more than once in included_checks")]
    DuplicateCheck(CheckName),

    /// An included check has no detector to produce its result.
    #[error("check '{0}' is included in the verdict but has no enabled detector")]
    NotEnabled(CheckName),

    /// Two detectors answer the same check.
    #[error("more than one detector is configured for check '{0}'")]
    DuplicateDetector(CheckName),
}

/// Failure to persist the outcome of a run.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Appending to the audit log failed.
    #[error("failed to append to audit log {}", path.display())]
    AuditLog {
        /// Log file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Moving a retained image into the results directory failed.
    #[error("failed to relocate {} into {}", image.display(), dir.display())]
    Relocation {
        /// Image being relocated.
        image: PathBuf,
        /// Results directory.
        dir: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Failure of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The submitted image could not be read into a working copy. Nothing was
    /// assessed or logged.
    #[error("could not read {}", path.display())]
    Input {
        /// Submitted image.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The verdict was computed but could not be recorded or the image could
    /// not be kept. Distinct from a `Bad` verdict.
    #[error("could not persist: results computed but not recorded")]
    Storage {
        /// The computed results, for display.
        assessment: Box<Assessment>,
        /// What failed.
        #[source]
        source: StorageError,
    },
}
