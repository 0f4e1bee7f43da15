//! Last-modified timestamps

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// An opaque, totally ordered point in time attached to a path.
///
/// The driver only ever compares timestamps; it never inspects them.
/// `NativeFileSystem` produces real mtimes, `MemoryFileSystem` produces
/// ticks of a logical write clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(SystemTime);

impl Timestamp {
    /// Wrap a system time.
    pub fn new(time: SystemTime) -> Self {
        Self(time)
    }

    /// Build a timestamp from a logical clock tick.
    ///
    /// Tick N maps to N nanoseconds past the epoch, so tick order is
    /// timestamp order.
    pub fn from_tick(tick: u64) -> Self {
        Self(UNIX_EPOCH + Duration::from_nanos(tick))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self(time)
    }
}
