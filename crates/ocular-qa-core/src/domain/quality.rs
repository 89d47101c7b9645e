//! Normalized per-check states and the aggregated verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality of a single check after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityState {
    /// The check passed.
    Good,
    /// The check found a defect.
    Bad,
    /// The check passed only partially.
    Partial,
    /// No quality meaning could be derived.
    Undetermined,
}

impl QualityState {
    /// Maps a tri-state detector code. Anything other than `Y`, `N` or `P`
    /// is undetermined.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "Y" => Self::Good,
            "N" => Self::Bad,
            "P" => Self::Partial,
            _ => Self::Undetermined,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Bad => "Bad",
            Self::Partial => "Partial",
            Self::Undetermined => "Unknown",
        }
    }
}

impl fmt::Display for QualityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregated verdict for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallQuality {
    /// At least one included check failed.
    Bad,
    /// No failure, but not every included check is good.
    Usable,
    /// Every included check is good.
    Good,
}

impl OverallQuality {
    /// Display label, as written to the audit log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bad => "Bad Quality",
            Self::Usable => "Usable Quality",
            Self::Good => "Good Quality",
        }
    }

    /// Whether an image with this verdict is kept.
    #[must_use]
    pub const fn is_retained(self) -> bool {
        !matches!(self, Self::Bad)
    }
}

impl fmt::Display for OverallQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
