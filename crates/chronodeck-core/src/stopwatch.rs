//! Stopwatch accumulator.
//!
//! Elapsed time is derived from an anchor instant rather than accumulated
//! tick by tick, so a late or skipped tick never loses time. The anchor is
//! recomputed on every start as `now - elapsed`, which absorbs the length of
//! any pause.
//!
//! ```text
//! Stopped(elapsed=0) -> Running -> Paused -> Running -> ... -> (reset) Stopped
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;
use crate::format::format_stopwatch;
use crate::time_source::epoch_ms;

/// A recorded split of a running stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapRecord {
    /// 1-based, in recording order.
    pub index: u32,
    /// Stopwatch reading when the lap was taken.
    pub cumulative_ms: u64,
    /// Time since the previous lap (or since zero for the first lap).
    pub delta_ms: u64,
}

impl LapRecord {
    pub fn label(&self) -> String {
        format!("LAP {:02}", self.index)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    elapsed_ms: u64,
    running: bool,
    /// Epoch ms at which the stopwatch would have read zero. Only meaningful
    /// while running.
    anchor_ms: Option<u64>,
    /// Most recent first.
    laps: Vec<LapRecord>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Laps, most recent first.
    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn latest_lap(&self) -> Option<&LapRecord> {
        self.laps.first()
    }

    pub fn can_lap(&self) -> bool {
        self.running && self.elapsed_ms > 0
    }

    pub fn readout(&self) -> String {
        format_stopwatch(self.elapsed_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.running {
            return None;
        }
        self.anchor_ms = Some(epoch_ms(now).saturating_sub(self.elapsed_ms));
        self.running = true;
        debug!(elapsed_ms = self.elapsed_ms, "stopwatch started");
        Some(Event::StopwatchStarted {
            elapsed_ms: self.elapsed_ms,
            at: now,
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.sample(now);
        self.running = false;
        self.anchor_ms = None;
        debug!(elapsed_ms = self.elapsed_ms, "stopwatch paused");
        Some(Event::StopwatchPaused {
            elapsed_ms: self.elapsed_ms,
            at: now,
        })
    }

    /// The single start/stop button: pause when running, start otherwise.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.running {
            self.pause(now)
        } else {
            self.start(now)
        }
    }

    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.running = false;
        self.anchor_ms = None;
        self.elapsed_ms = 0;
        self.laps.clear();
        debug!("stopwatch reset");
        Some(Event::StopwatchReset { at: now })
    }

    /// Record a split. Ignored unless running with a non-zero reading.
    pub fn lap(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.running {
            self.sample(now);
        }
        if !self.can_lap() {
            return None;
        }
        let previous = self.latest_lap().map(|l| l.cumulative_ms).unwrap_or(0);
        let lap = LapRecord {
            index: self.laps.len() as u32 + 1,
            cumulative_ms: self.elapsed_ms,
            delta_ms: self.elapsed_ms.saturating_sub(previous),
        };
        self.laps.insert(0, lap);
        debug!(index = lap.index, cumulative_ms = lap.cumulative_ms, "lap recorded");
        Some(Event::LapRecorded { lap, at: now })
    }

    /// Call periodically while running to refresh the reading.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.running {
            self.sample(now);
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn sample(&mut self, now: DateTime<Utc>) {
        if let Some(anchor) = self.anchor_ms {
            // A wall clock stepping backwards must not rewind the reading.
            self.elapsed_ms = self.elapsed_ms.max(epoch_ms(now).saturating_sub(anchor));
        }
    }
}
