//! Explicit inclusion list for the verdict.

use std::collections::BTreeSet;

use tracing::warn;

use crate::aggregate::aggregate;
use crate::domain::{CheckName, OverallQuality, QualityState};
use crate::error::ConfigError;

/// Which checks take part in the verdict.
///
/// Checks outside the list are still run and displayed, but never vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    included: BTreeSet<CheckName>,
}

impl GatePolicy {
    /// Creates a policy from an explicit list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyInclusion`] for an empty list and
    /// [`ConfigError::DuplicateCheck`] when a check appears twice.
    pub fn new<I>(checks: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = CheckName>,
    {
        let mut included = BTreeSet::new();
        for check in checks {
            if !included.insert(check) {
                return Err(ConfigError::DuplicateCheck(check));
            }
        }
        if included.is_empty() {
            return Err(ConfigError::EmptyInclusion);
        }
        for check in &included {
            if !check.kind().has_quality_semantics() {
                warn!(
                    "Check '{check}' has no quality mapping; including it caps the verdict at usable"
                );
            }
        }
        Ok(Self { included })
    }

    /// Creates a policy from configuration names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCheck`] for an unrecognized name, plus
    /// the errors of [`GatePolicy::new`].
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let checks = names
            .iter()
            .map(|n| n.as_ref().parse::<CheckName>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(checks)
    }

    /// Whether a check votes.
    #[must_use]
    pub fn includes(&self, check: CheckName) -> bool {
        self.included.contains(&check)
    }

    /// Included checks in display order.
    pub fn included(&self) -> impl Iterator<Item = CheckName> + '_ {
        self.included.iter().copied()
    }

    /// Ensures every included check has a detector.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotEnabled`] for the first included check that
    /// is not in `available`.
    pub fn validate_against(&self, available: &BTreeSet<CheckName>) -> Result<(), ConfigError> {
        match self.included.iter().find(|c| !available.contains(c)) {
            Some(check) => Err(ConfigError::NotEnabled(*check)),
            None => Ok(()),
        }
    }

    /// Aggregates the states of included checks, ignoring the rest.
    #[must_use]
    pub fn verdict(&self, states: &[(CheckName, QualityState)]) -> OverallQuality {
        aggregate(
            states
                .iter()
                .filter(|(check, _)| self.includes(*check))
                .map(|(_, state)| *state),
        )
    }
}

impl Default for GatePolicy {
    /// Every check with quality semantics; the categorical focus check is
    /// excluded.
    fn default() -> Self {
        Self {
            included: CheckName::ALL
                .into_iter()
                .filter(|c| c.kind().has_quality_semantics())
                .collect(),
        }
    }
}
