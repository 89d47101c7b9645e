//! Raw detector result builders for testing.

use ocular_qa_core::domain::{CheckKind, CheckName, CheckResult};
use serde_json::Value;

/// Builder for detector results in the shape each check kind reports.
///
/// Provides convenience methods for results that normalize to a known
/// state, so tests can describe an image by its expected verdict.
#[derive(Debug, Clone, Default)]
pub struct CheckResultBuilder {
    result: CheckResult,
}

impl CheckResultBuilder {
    // === Tri-state checks ===

    /// A tri-state result carrying `code` (`Y`, `N`, `P` or anything else).
    #[must_use]
    pub fn tri_state(code: &str) -> Self {
        Self {
            result: CheckResult::empty().with(CheckKind::TRI_STATE_FIELD, code),
        }
    }

    // === Binary-flag checks ===

    /// A binary-flag result for `check` with the flag set to `value`.
    ///
    /// Falls back to a bare `flag` key for checks that are not binary flags.
    #[must_use]
    pub fn binary(check: CheckName, value: bool) -> Self {
        let field = match check.kind() {
            CheckKind::BinaryFlag { field, .. } => field,
            _ => "flag",
        };
        Self {
            result: CheckResult::empty().with(field, value),
        }
    }

    // === Categorical checks ===

    /// A categorical focus result predicting `label`.
    #[must_use]
    pub fn categorical(label: &str) -> Self {
        let field = match CheckName::Focus.kind() {
            CheckKind::Categorical { field } => field,
            _ => "prediction",
        };
        Self {
            result: CheckResult::empty().with(field, label),
        }
    }

    /// Adds a confidence value.
    #[must_use]
    pub fn confidence(self, confidence: f64) -> Self {
        self.field(CheckResult::CONFIDENCE_FIELD, confidence)
    }

    /// Adds an arbitrary field.
    #[must_use]
    pub fn field(self, key: &str, value: impl Into<Value>) -> Self {
        Self {
            result: self.result.with(key, value),
        }
    }

    /// Finishes the result.
    #[must_use]
    pub fn build(self) -> CheckResult {
        self.result
    }

    // === Per-check presets ===

    /// A result for `check` that normalizes to good.
    ///
    /// The focus check has no quality mapping; it gets a plausible
    /// prediction instead.
    #[must_use]
    pub fn good(check: CheckName) -> CheckResult {
        match check.kind() {
            CheckKind::TriState => Self::tri_state("Y"),
            CheckKind::BinaryFlag { .. } => Self::binary(check, true),
            CheckKind::Categorical { .. } => Self::categorical("Sharp"),
        }
        .confidence(0.9)
        .build()
    }

    /// A result for `check` that normalizes to bad.
    #[must_use]
    pub fn bad(check: CheckName) -> CheckResult {
        match check.kind() {
            CheckKind::TriState => Self::tri_state("N"),
            CheckKind::BinaryFlag { .. } => Self::binary(check, false),
            CheckKind::Categorical { .. } => Self::categorical("Blurry"),
        }
        .confidence(0.8)
        .build()
    }

    /// Good results for every check.
    #[must_use]
    pub fn all_good() -> Vec<(CheckName, CheckResult)> {
        CheckName::ALL
            .into_iter()
            .map(|check| (check, Self::good(check)))
            .collect()
    }
}
