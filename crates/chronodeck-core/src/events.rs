use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::TimerPhase;
use crate::mode::Mode;
use crate::stopwatch::LapRecord;

/// Every state change in the deck produces an Event.
/// Front ends render them; the alert dispatcher reacts to completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ModeChanged {
        from: Mode,
        to: Mode,
        at: DateTime<Utc>,
    },
    StopwatchStarted {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchReset {
        at: DateTime<Utc>,
    },
    LapRecorded {
        lap: LapRecord,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_ms: u64,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerDurationChanged {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. Emitted once per run.
    TimerCompleted {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// The user silenced a completed countdown; remaining stays at zero.
    TimerAcknowledged {
        at: DateTime<Utc>,
    },
    SoundToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        readout: String,
        timer_phase: Option<TimerPhase>,
        progress: Option<f64>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::ModeChanged { at, .. }
            | Event::StopwatchStarted { at, .. }
            | Event::StopwatchPaused { at, .. }
            | Event::StopwatchReset { at }
            | Event::LapRecorded { at, .. }
            | Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::TimerDurationChanged { at, .. }
            | Event::TimerCompleted { at, .. }
            | Event::TimerAcknowledged { at }
            | Event::SoundToggled { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
