//! Result normalization.
//!
//! Maps each detector's raw result onto [`QualityState`] and produces the
//! display strings shown to users and written to the audit log. Every
//! function here is pure and total: malformed input degrades to
//! `Undetermined` (or `Unknown` for display) instead of failing the run.

use serde_json::Value;

use crate::domain::{CheckKind, CheckName, CheckResult, QualityState};

/// Display string for results without a usable value.
const UNKNOWN: &str = "Unknown";

/// Normalizes a raw result into a quality state.
///
/// - tri-state: `Y`/`N`/`P` map to good/bad/partial, anything else is
///   undetermined.
/// - binary-flag: `true` is good, `false` or a missing flag is bad; a flag of
///   the wrong type is undetermined.
/// - categorical: always undetermined.
#[must_use]
pub fn normalize(check: CheckName, raw: &CheckResult) -> QualityState {
    match check.kind() {
        CheckKind::TriState => match raw.get(CheckKind::TRI_STATE_FIELD) {
            Some(Value::String(code)) => QualityState::from_code(code),
            _ => QualityState::Undetermined,
        },
        CheckKind::BinaryFlag { field, .. } => match raw.get(field) {
            Some(Value::Bool(true)) => QualityState::Good,
            Some(Value::Bool(false) | Value::Null) | None => QualityState::Bad,
            Some(_) => QualityState::Undetermined,
        },
        CheckKind::Categorical { .. } => QualityState::Undetermined,
    }
}

/// Display string for a raw result.
#[must_use]
pub fn display_result(check: CheckName, raw: &CheckResult) -> String {
    match check.kind() {
        CheckKind::TriState => normalize(check, raw).label().to_string(),
        CheckKind::BinaryFlag { field, yes, no } => match raw.get(field) {
            Some(Value::Bool(true)) => yes.to_string(),
            Some(Value::Bool(false) | Value::Null) | None => no.to_string(),
            Some(_) => UNKNOWN.to_string(),
        },
        CheckKind::Categorical { field } => raw
            .get(field)
            .and_then(Value::as_str)
            .map_or_else(|| UNKNOWN.to_string(), str::to_string),
    }
}

/// Confidence formatted with two decimals.
///
/// A missing confidence renders as `0.00`, or `-` for checks whose detector
/// does not report one.
#[must_use]
pub fn display_confidence(check: CheckName, raw: &CheckResult) -> String {
    match raw.confidence() {
        Some(c) => format!("{c:.2}"),
        None if check.reports_confidence() => format!("{:.2}", 0.0),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> CheckResult {
        CheckResult::from_value(value)
    }

    #[test]
    fn test_tri_state_codes() {
        for check in [
            CheckName::Reflection,
            CheckName::Completeness,
            CheckName::Resolution,
        ] {
            assert_eq!(
                normalize(check, &raw(json!({"quality_state": "Y"}))),
                QualityState::Good
            );
            assert_eq!(
                normalize(check, &raw(json!({"quality_state": "N"}))),
                QualityState::Bad
            );
            assert_eq!(
                normalize(check, &raw(json!({"quality_state": "P"}))),
                QualityState::Partial
            );
        }
    }

    #[test]
    fn test_tri_state_unrecognized_or_missing() {
        let check = CheckName::Reflection;
        assert_eq!(
            normalize(check, &raw(json!({"quality_state": "X"}))),
            QualityState::Undetermined
        );
        assert_eq!(
            normalize(check, &raw(json!({"confidence": 0.8}))),
            QualityState::Undetermined
        );
        assert_eq!(
            normalize(check, &raw(json!({"quality_state": 1}))),
            QualityState::Undetermined
        );
    }

    #[test]
    fn test_binary_flag() {
        assert_eq!(
            normalize(CheckName::Presence, &raw(json!({"has_eye": true}))),
            QualityState::Good
        );
        assert_eq!(
            normalize(CheckName::Presence, &raw(json!({"has_eye": false}))),
            QualityState::Bad
        );
        assert_eq!(
            normalize(
                CheckName::Illumination,
                &raw(json!({"lighting_correct": true}))
            ),
            QualityState::Good
        );
    }

    #[test]
    fn test_binary_flag_missing_fails_safe() {
        assert_eq!(
            normalize(CheckName::Presence, &CheckResult::empty()),
            QualityState::Bad
        );
        // The illumination flag is not read from the presence key.
        assert_eq!(
            normalize(CheckName::Illumination, &raw(json!({"has_eye": true}))),
            QualityState::Bad
        );
    }

    #[test]
    fn test_binary_flag_wrong_type_is_undetermined() {
        assert_eq!(
            normalize(CheckName::Presence, &raw(json!({"has_eye": "yes"}))),
            QualityState::Undetermined
        );
        assert_eq!(
            display_result(CheckName::Presence, &raw(json!({"has_eye": 1}))),
            "Unknown"
        );
    }

    #[test]
    fn test_categorical_never_votes() {
        assert_eq!(
            normalize(CheckName::Focus, &raw(json!({"prediction": "sharp"}))),
            QualityState::Undetermined
        );
        assert_eq!(
            normalize(CheckName::Focus, &raw(json!({"quality_state": "Y"}))),
            QualityState::Undetermined
        );
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(
            display_result(CheckName::Presence, &raw(json!({"has_eye": true}))),
            "Yes"
        );
        assert_eq!(
            display_result(CheckName::Illumination, &CheckResult::empty()),
            "Incorrect"
        );
        assert_eq!(
            display_result(CheckName::Focus, &raw(json!({"prediction": "blurry"}))),
            "blurry"
        );
        assert_eq!(
            display_result(CheckName::Focus, &CheckResult::empty()),
            "Unknown"
        );
        assert_eq!(
            display_result(CheckName::Completeness, &raw(json!({"quality_state": "P"}))),
            "Partial"
        );
    }

    #[test]
    fn test_display_confidence() {
        assert_eq!(
            display_confidence(CheckName::Presence, &raw(json!({"confidence": 0.876}))),
            "0.88"
        );
        assert_eq!(
            display_confidence(CheckName::Reflection, &CheckResult::empty()),
            "0.00"
        );
        assert_eq!(
            display_confidence(CheckName::Illumination, &CheckResult::empty()),
            "-"
        );
        assert_eq!(
            display_confidence(CheckName::Illumination, &raw(json!({"confidence": 0.5}))),
            "0.50"
        );
    }
}
