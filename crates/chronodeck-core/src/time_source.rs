//! Wall-clock abstraction.
//!
//! Every engine samples "now" through a [`TimeSource`] instead of calling
//! `Utc::now()` directly, so tests can drive time by hand with
//! [`ManualTimeSource`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// A source of the current instant.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch, clamped at zero.
    fn now_ms(&self) -> u64 {
        epoch_ms(self.now())
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A virtual clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    ms: AtomicI64,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            ms: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Start the virtual clock at the given epoch milliseconds.
    pub fn at_ms(ms: u64) -> Self {
        Self {
            ms: AtomicI64::new(i64::try_from(ms).unwrap_or(i64::MAX)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.ms.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Jump to an absolute instant. Moving backwards is allowed so tests can
    /// simulate wall-clock corrections.
    pub fn set(&self, to: DateTime<Utc>) {
        self.ms.store(to.timestamp_millis(), Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        from_epoch_ms(self.ms.load(Ordering::SeqCst))
    }
}

/// Wall-clock reading captured once, then advanced by tokio's monotonic
/// clock. Immune to system clock steps, and follows tokio's paused clock in
/// tests.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    origin: tokio::time::Instant,
    origin_utc: DateTime<Utc>,
}

impl MonotonicTimeSource {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(origin_utc: DateTime<Utc>) -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            origin_utc,
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed())
            .unwrap_or(chrono::Duration::zero());
        self.origin_utc + elapsed
    }
}

/// Milliseconds since the Unix epoch; instants before 1970 map to 0.
pub fn epoch_ms(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp_millis()).unwrap_or(0)
}

pub(crate) fn from_epoch_ms(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
