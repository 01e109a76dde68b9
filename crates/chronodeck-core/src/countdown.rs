//! Countdown timer state machine.
//!
//! Like the stopwatch, the countdown is wall-clock based: `start()` fixes a
//! target instant and every `tick()` recomputes `remaining = target - now`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --tick(remaining=0)--> Complete
//!  ^                 |                              |
//!  +------pause------+                              |
//!  +--------------------stop / reset----------------+
//! ```
//!
//! `stop()` acknowledges a completed countdown and leaves `remaining_ms` at
//! zero, so the next `start()` is rejected until `reset()` or a new duration.
//! `reset()` from `Complete` restores the full duration instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;
use crate::format::{format_countdown, MS_PER_HOUR, MS_PER_MINUTE};
use crate::time_source::epoch_ms;

/// Longest countdown that can be configured.
pub const MAX_DURATION_MS: u64 = 24 * MS_PER_HOUR;

/// Duration a fresh countdown starts with.
pub const DEFAULT_DURATION_MS: u64 = 5 * MS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Complete,
}

#[derive(Debug, Clone)]
pub struct CountdownTimer {
    duration_ms: u64,
    remaining_ms: u64,
    phase: TimerPhase,
    /// Epoch ms at which the countdown reaches zero. Only set while running.
    target_ms: Option<u64>,
    /// Edge guard for the completion signal, cleared on start and reset.
    signaled: bool,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

impl CountdownTimer {
    pub fn new(duration_ms: u64) -> Self {
        let duration_ms = clamp_duration(duration_ms);
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            phase: TimerPhase::Idle,
            target_ms: None,
            signaled: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TimerPhase::Complete
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Duration and remaining time can only change while neither running nor
    /// waiting for a completion to be acknowledged.
    pub fn is_adjustable(&self) -> bool {
        self.phase == TimerPhase::Idle
    }

    pub fn can_start(&self) -> bool {
        self.phase == TimerPhase::Idle && self.remaining_ms > 0
    }

    /// Fraction of the countdown still to go, for progress rings.
    ///
    /// Always within `0.0..=1.0`; a zero duration reports `0.0`.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.remaining_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn readout(&self) -> String {
        format_countdown(self.remaining_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_duration(&mut self, duration_ms: u64, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_adjustable() {
            return None;
        }
        self.duration_ms = clamp_duration(duration_ms);
        self.remaining_ms = self.duration_ms;
        debug!(duration_ms = self.duration_ms, "countdown duration set");
        Some(Event::TimerDurationChanged {
            duration_ms: self.duration_ms,
            at: now,
        })
    }

    /// Shift the duration by `delta_ms` (negative shortens it). Any paused
    /// progress is discarded: remaining snaps back to the new duration.
    pub fn adjust(&mut self, delta_ms: i64, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_adjustable() {
            return None;
        }
        let magnitude = delta_ms.unsigned_abs();
        let next = if delta_ms < 0 {
            self.duration_ms.saturating_sub(magnitude)
        } else {
            self.duration_ms.saturating_add(magnitude)
        };
        self.set_duration(next, now)
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.can_start() {
            return None;
        }
        self.target_ms = Some(epoch_ms(now).saturating_add(self.remaining_ms));
        self.phase = TimerPhase::Running;
        self.signaled = false;
        debug!(remaining_ms = self.remaining_ms, "countdown started");
        Some(Event::TimerStarted {
            remaining_ms: self.remaining_ms,
            duration_ms: self.duration_ms,
            at: now,
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        // A pause that lands past the target still completes the run.
        if let Some(done) = self.tick(now) {
            return Some(done);
        }
        self.phase = TimerPhase::Idle;
        self.target_ms = None;
        debug!(remaining_ms = self.remaining_ms, "countdown paused");
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: now,
        })
    }

    /// Back to `Idle` with the full duration, from any phase.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.phase = TimerPhase::Idle;
        self.target_ms = None;
        self.remaining_ms = self.duration_ms;
        self.signaled = false;
        debug!(duration_ms = self.duration_ms, "countdown reset");
        Some(Event::TimerReset {
            duration_ms: self.duration_ms,
            at: now,
        })
    }

    /// Acknowledge a completed countdown. Remaining time stays at zero.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_complete() {
            return None;
        }
        self.phase = TimerPhase::Idle;
        debug!("countdown completion acknowledged");
        Some(Event::TimerAcknowledged { at: now })
    }

    /// The single start/stop button: acknowledge when complete, otherwise
    /// pause or start (starting needs time left).
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.phase {
            TimerPhase::Complete => self.stop(now),
            TimerPhase::Running => self.pause(now),
            TimerPhase::Idle => self.start(now),
        }
    }

    /// Call periodically while running. Returns `Some(Event::TimerCompleted)`
    /// exactly once per run, on the tick that reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        let target = self.target_ms?;
        let left = target.saturating_sub(epoch_ms(now));
        // Never count back up, even if the wall clock steps backwards.
        self.remaining_ms = self.remaining_ms.min(left);
        if self.remaining_ms > 0 {
            return None;
        }

        self.phase = TimerPhase::Complete;
        self.target_ms = None;
        if self.signaled {
            return None;
        }
        self.signaled = true;
        debug!(duration_ms = self.duration_ms, "countdown complete");
        Some(Event::TimerCompleted {
            duration_ms: self.duration_ms,
            at: now,
        })
    }
}

pub fn clamp_duration(ms: u64) -> u64 {
    ms.min(MAX_DURATION_MS)
}
