//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod audit_log;
mod clock;
mod image_source;
mod progress;
mod report_output;
mod results_store;

pub use audit_log::AuditLog;
pub use clock::Clock;
pub use image_source::ImageSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use report_output::ReportOutput;
pub use results_store::ResultsStore;
