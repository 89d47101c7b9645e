//! Time source port.

use time::OffsetDateTime;

/// Source of run timestamps.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> OffsetDateTime;
}
