//! Test support utilities for ocular-qa.
//!
//! Provides mocks for every core port and builders for raw detector results,
//! for testing the quality pipeline without real detectors or storage.
//!
//! # Example
//!
//! ```
//! use ocular_qa_core::domain::CheckName;
//! use ocular_qa_test_support::{CheckResultBuilder, MockDetector};
//!
//! // A detector that always reports a partial reflection result
//! let result = CheckResultBuilder::tri_state("P").confidence(0.7).build();
//! let detector = MockDetector::returning(CheckName::Reflection, result);
//! ```

mod builders;
mod mocks;

pub use builders::CheckResultBuilder;
pub use mocks::{
    FixedClock, MockAuditLog, MockDetector, MockImageSource, MockProgressSink, MockReportOutput,
    MockResultsStore,
};
