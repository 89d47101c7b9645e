//! Raw detector output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque result of one detector run.
///
/// Keys depend on the detector kind (see [`super::CheckKind`]); the core
/// reads them leniently and never fails on missing or mistyped fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckResult(Map<String, Value>);

impl CheckResult {
    /// Key holding the detector confidence.
    pub const CONFIDENCE_FIELD: &'static str = "confidence";

    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// A result with no fields, used when a detector produced nothing usable.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Converts an arbitrary JSON value. Anything but an object is treated as
    /// a malformed result and yields an empty mapping.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::empty(),
        }
    }

    /// Returns a copy with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw field lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the detector reported no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Detector confidence, when present as a number in `[0, 1]`.
    #[must_use]
    pub fn confidence(&self) -> Option<f64> {
        self.get(Self::CONFIDENCE_FIELD)
            .and_then(Value::as_f64)
            .filter(|c| (0.0..=1.0).contains(c))
    }

    /// Underlying fields.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for CheckResult {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_object() {
        let result = CheckResult::from_value(json!({"has_eye": true, "confidence": 0.9}));
        assert_eq!(result.get("has_eye"), Some(&Value::Bool(true)));
        assert_eq!(result.confidence(), Some(0.9));
    }

    #[test]
    fn test_from_value_non_object_is_empty() {
        assert!(CheckResult::from_value(json!([1, 2, 3])).is_empty());
        assert!(CheckResult::from_value(json!("Y")).is_empty());
        assert!(CheckResult::from_value(Value::Null).is_empty());
    }

    #[test]
    fn test_confidence_missing_or_invalid() {
        assert_eq!(CheckResult::empty().confidence(), None);
        assert_eq!(CheckResult::empty().with("confidence", "high").confidence(), None);
        assert_eq!(CheckResult::empty().with("confidence", 1.5).confidence(), None);
        assert_eq!(CheckResult::empty().with("confidence", -0.1).confidence(), None);
    }

    #[test]
    fn test_confidence_integer_bounds() {
        assert_eq!(CheckResult::empty().with("confidence", 1).confidence(), Some(1.0));
        assert_eq!(CheckResult::empty().with("confidence", 0).confidence(), Some(0.0));
    }
}
