//! Check identities and the raw-result schema each one produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the independent quality checks applied to an ocular photograph.
///
/// Declaration order is the display order used for reports and audit-log
/// columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    /// An eye is present in the frame.
    Presence,
    /// Focus classification (free-form label).
    Focus,
    /// Lighting is correct.
    Illumination,
    /// Specular reflection on the eye surface.
    Reflection,
    /// The whole eye is inside the frame.
    Completeness,
    /// Image resolution is sufficient.
    Resolution,
}

impl CheckName {
    /// Every known check, in display order.
    pub const ALL: [Self; 6] = [
        Self::Presence,
        Self::Focus,
        Self::Illumination,
        Self::Reflection,
        Self::Completeness,
        Self::Resolution,
    ];

    /// Machine name used in configuration files and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::Focus => "focus",
            Self::Illumination => "illumination",
            Self::Reflection => "reflection",
            Self::Completeness => "completeness",
            Self::Resolution => "resolution",
        }
    }

    /// Human label, also used as the audit-log column name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Presence => "Eye Presence",
            Self::Focus => "Focus",
            Self::Illumination => "Illumination",
            Self::Reflection => "Reflection",
            Self::Completeness => "Completeness",
            Self::Resolution => "Resolution",
        }
    }

    /// Result schema produced by this check's detector.
    #[must_use]
    pub const fn kind(self) -> CheckKind {
        match self {
            Self::Presence => CheckKind::BinaryFlag {
                field: "has_eye",
                yes: "Yes",
                no: "No",
            },
            Self::Illumination => CheckKind::BinaryFlag {
                field: "lighting_correct",
                yes: "Correct",
                no: "Incorrect",
            },
            Self::Focus => CheckKind::Categorical { field: "prediction" },
            Self::Reflection | Self::Completeness | Self::Resolution => CheckKind::TriState,
        }
    }

    /// Whether the detector is expected to report a confidence value.
    ///
    /// The illumination detector reports none, so its confidence renders as
    /// `-` rather than `0.00` when absent.
    #[must_use]
    pub const fn reports_confidence(self) -> bool {
        !matches!(self, Self::Illumination)
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckName {
    type Err = ConfigError;

    /// Parses a machine name (`"presence"`) or a label (`"Eye Presence"`),
    /// ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ConfigError::UnknownCheck(s.to_string()))
    }
}

/// Raw result schema of a detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// `{<field>: bool, confidence: float}`.
    BinaryFlag {
        /// Detector-specific boolean key.
        field: &'static str,
        /// Display string for `true`.
        yes: &'static str,
        /// Display string for `false`.
        no: &'static str,
    },
    /// `{prediction: string, confidence: float}`; no quality ordering.
    Categorical {
        /// Key holding the label.
        field: &'static str,
    },
    /// `{quality_state: "Y" | "N" | "P", confidence: float}`.
    TriState,
}

impl CheckKind {
    /// Key holding the tri-state code.
    pub const TRI_STATE_FIELD: &'static str = "quality_state";

    /// Whether results of this kind carry pass/fail meaning.
    #[must_use]
    pub const fn has_quality_semantics(self) -> bool {
        !matches!(self, Self::Categorical { .. })
    }
}
