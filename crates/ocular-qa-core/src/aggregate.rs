//! Verdict aggregation.

use crate::domain::{OverallQuality, QualityState};

/// Reduces included per-check states into one verdict.
///
/// Priority order, not a vote:
/// 1. any `Bad` state makes the verdict `Bad`;
/// 2. otherwise, if every state is `Good`, the verdict is `Good`;
/// 3. otherwise the verdict is `Usable`.
///
/// An empty sequence has no evidence of quality and yields `Usable`.
#[must_use]
pub fn aggregate<I>(states: I) -> OverallQuality
where
    I: IntoIterator<Item = QualityState>,
{
    let mut seen = false;
    let mut all_good = true;

    for state in states {
        seen = true;
        match state {
            QualityState::Bad => return OverallQuality::Bad,
            QualityState::Good => {}
            QualityState::Partial | QualityState::Undetermined => all_good = false,
        }
    }

    if seen && all_good {
        OverallQuality::Good
    } else {
        OverallQuality::Usable
    }
}
