//! Core domain types for the quality gate.

mod check;
mod detector;
mod quality;
mod record;
mod result;

pub use check::{CheckKind, CheckName};
pub use detector::Detector;
pub use quality::{OverallQuality, QualityState};
pub use record::{
    Assessment, AuditRecord, CheckReport, Disposition, RunReport, FIXED_COLUMNS, SCHEMA_VERSION,
};
pub use result::CheckResult;
