//! Per-run records: the audit row and the caller-facing report.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

use super::{CheckName, OverallQuality, QualityState};

/// Version of the report schema emitted by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Leading audit-log columns, before the per-check columns.
pub const FIXED_COLUMNS: [&str; 2] = ["timestamp", "overall"];

/// One row of the audit log. Created once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    timestamp: OffsetDateTime,
    overall: OverallQuality,
    results: Vec<(String, String)>,
}

impl AuditRecord {
    /// Creates a record. `results` maps column names to display strings in
    /// column order.
    #[must_use]
    pub const fn new(
        timestamp: OffsetDateTime,
        overall: OverallQuality,
        results: Vec<(String, String)>,
    ) -> Self {
        Self {
            timestamp,
            overall,
            results,
        }
    }

    /// Builds the record for an assessment.
    #[must_use]
    pub fn from_assessment(timestamp: OffsetDateTime, assessment: &Assessment) -> Self {
        let results = assessment
            .checks
            .iter()
            .map(|c| (c.label.clone(), c.result.clone()))
            .collect();
        Self::new(timestamp, assessment.overall, results)
    }

    /// Time of the run.
    #[must_use]
    pub const fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// Verdict of the run.
    #[must_use]
    pub const fn overall(&self) -> OverallQuality {
        self.overall
    }

    /// Per-check display strings in column order.
    #[must_use]
    pub fn results(&self) -> &[(String, String)] {
        &self.results
    }

    /// Timestamp as written to the log: `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn timestamp_display(&self) -> String {
        let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        self.timestamp
            .format(fmt)
            .unwrap_or_else(|_| self.timestamp.unix_timestamp().to_string())
    }

    /// Column names of this record: `timestamp`, `overall`, then one per check.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.results.iter().map(|(name, _)| name.as_str()))
            .collect()
    }

    /// Value for a column, if this record has it.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<String> {
        match column {
            "timestamp" => Some(self.timestamp_display()),
            "overall" => Some(self.overall.label().to_string()),
            _ => self
                .results
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.clone()),
        }
    }
}

/// Display view of one check within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Which check.
    pub check: CheckName,
    /// Human label.
    pub label: String,
    /// Display string of the raw result.
    pub result: String,
    /// Confidence formatted with two decimals, or `-`.
    pub confidence: String,
    /// Normalized state.
    pub state: QualityState,
    /// Whether the state took part in the verdict.
    pub included: bool,
    /// Detector failure, when the detector could not produce a result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything computed for an image before disposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Path of the submitted image.
    pub source: String,
    /// Time of the run (RFC 3339).
    pub timestamp: String,
    /// Per-check results in display order.
    pub checks: Vec<CheckReport>,
    /// Aggregated verdict.
    pub overall: OverallQuality,
}

/// What happened to the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Disposition {
    /// The image was relocated into the results directory.
    Saved {
        /// Final location.
        path: PathBuf,
    },
    /// The image failed the gate and was discarded; the run is still logged.
    Rejected {
        /// Why the image was not kept.
        reason: String,
    },
    /// Results were computed but could not be persisted.
    NotPersisted {
        /// Storage failure description.
        reason: String,
    },
}

impl Disposition {
    /// Rejection used for a `BAD` verdict.
    #[must_use]
    pub fn rejected() -> Self {
        Self::Rejected {
            reason: "Image quality is bad. Image not saved, but results are logged.".to_string(),
        }
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Saved { path } => format!("Image saved successfully at `{}`", path.display()),
            Self::Rejected { reason } => reason.clone(),
            Self::NotPersisted { reason } => {
                format!("Could not persist: results computed but not recorded ({reason})")
            }
        }
    }
}

/// Caller-facing outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version.
    pub schema_version: u32,
    /// Computed results.
    #[serde(flatten)]
    pub assessment: Assessment,
    /// What happened to the image.
    pub disposition: Disposition,
}

impl RunReport {
    /// Combines an assessment with its disposition.
    #[must_use]
    pub const fn new(assessment: Assessment, disposition: Disposition) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            assessment,
            disposition,
        }
    }

    /// Verdict of the run.
    #[must_use]
    pub const fn overall(&self) -> OverallQuality {
        self.assessment.overall
    }

    /// Saved location, if the image was kept.
    #[must_use]
    pub fn saved_path(&self) -> Option<&PathBuf> {
        match &self.disposition {
            Disposition::Saved { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record() -> AuditRecord {
        AuditRecord::new(
            datetime!(2024-03-05 14:07:09 UTC),
            OverallQuality::Usable,
            vec![
                ("Eye Presence".to_string(), "Yes".to_string()),
                ("Reflection".to_string(), "Partial".to_string()),
            ],
        )
    }

    #[test]
    fn test_timestamp_display() {
        assert_eq!(record().timestamp_display(), "2024-03-05 14:07:09");
    }

    #[test]
    fn test_columns_in_order() {
        assert_eq!(
            record().columns(),
            vec!["timestamp", "overall", "Eye Presence", "Reflection"]
        );
    }

    #[test]
    fn test_value_lookup() {
        let r = record();
        assert_eq!(r.value("overall").as_deref(), Some("Usable Quality"));
        assert_eq!(r.value("Reflection").as_deref(), Some("Partial"));
        assert_eq!(r.value("Resolution"), None);
    }

    #[test]
    fn test_disposition_serializes_with_status_tag() {
        let saved = Disposition::Saved {
            path: PathBuf::from("/tmp/x.jpg"),
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["status"], "saved");
        assert_eq!(json["path"], "/tmp/x.jpg");

        let json = serde_json::to_value(Disposition::rejected()).unwrap();
        assert_eq!(json["status"], "rejected");
    }

    #[test]
    fn test_disposition_messages() {
        assert!(Disposition::rejected().message().contains("not saved, but results are logged"));
        let failed = Disposition::NotPersisted {
            reason: "disk full".to_string(),
        };
        assert!(failed.message().contains("results computed but not recorded"));
    }
}
