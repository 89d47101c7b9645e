//! Ocular QA Adapters - External adapters for ocular-qa.
//!
//! This crate provides adapters for:
//! - CSV audit log shared between concurrent runs
//! - Results directory with collision-free naming
//! - Detectors run as external commands
//! - Filesystem image source and system clock

pub mod clock;
pub mod command;
pub mod csv_log;
pub mod fs;
pub mod results_store;

pub use clock::SystemClock;
pub use command::CommandDetector;
pub use csv_log::CsvAuditLog;
pub use fs::FsImageSource;
pub use results_store::FsResultsStore;

/// Default directory for retained images and the audit log.
pub const DEFAULT_RESULTS_DIR: &str = "saved_results";

/// Default audit log file name inside the results directory.
pub const DEFAULT_LOG_FILE: &str = "results_log.csv";
