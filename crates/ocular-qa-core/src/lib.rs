//! Ocular QA Core - Quality decision and persistence pipeline
//!
//! This crate contains the domain types shared by every caller, the result
//! normalizer, the verdict aggregation, the disposition policy and the ports
//! that adapters implement for detectors, the audit log and the results store.

pub mod aggregate;
pub mod disposition;
pub mod domain;
pub mod error;
pub mod gate;
pub mod normalize;
pub mod pipeline;
pub mod ports;

pub use aggregate::aggregate;
pub use disposition::DispositionPolicy;
pub use domain::{
    Assessment, AuditRecord, CheckKind, CheckName, CheckReport, CheckResult, Detector,
    Disposition, OverallQuality, QualityState, RunReport, FIXED_COLUMNS, SCHEMA_VERSION,
};
pub use error::{ConfigError, PipelineError, StorageError};
pub use gate::GatePolicy;
pub use normalize::{display_confidence, display_result, normalize};
pub use pipeline::{BatchSummary, QualityPipeline};
pub use ports::{
    AuditLog, Clock, ImageSource, ProgressEvent, ProgressSink, ReportOutput, ResultsStore,
};
