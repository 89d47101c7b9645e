//! System time source.

use ocular_qa_core::ports::Clock;
use time::OffsetDateTime;

/// Wall clock in the local time zone.
///
/// Falls back to UTC when the local offset cannot be determined, which the
/// `time` crate refuses to do in multi-threaded processes on some platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}
