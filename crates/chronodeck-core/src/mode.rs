//! Mode selection and the uniform command surface.
//!
//! Exactly one mode is active at a time. Switching modes discards the
//! outgoing mode's state: a stopwatch or countdown never survives
//! navigation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::{ClockSample, ClockSampler};
use crate::countdown::{CountdownTimer, TimerPhase, DEFAULT_DURATION_MS};
use crate::error::ValidationError;
use crate::events::Event;
use crate::notifier::{AlertDispatcher, AlertOutcome, CompletionAlert};
use crate::presets::{active_preset, default_presets, find_preset, TimerPreset};
use crate::stopwatch::{LapRecord, Stopwatch};
use crate::time_source::TimeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Clock,
    Stopwatch,
    Timer,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Clock, Mode::Stopwatch, Mode::Timer];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Clock => "Clock",
            Mode::Stopwatch => "Stopwatch",
            Mode::Timer => "Timer",
        }
    }

    /// Heading shown above the readout.
    pub fn title(self) -> &'static str {
        match self {
            Mode::Clock => "System Clock",
            Mode::Stopwatch => "Stopwatch",
            Mode::Timer => "Countdown Timer",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Clock => "clock",
            Mode::Stopwatch => "stopwatch",
            Mode::Timer => "timer",
        })
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clock" => Ok(Mode::Clock),
            "stopwatch" => Ok(Mode::Stopwatch),
            "timer" | "countdown" => Ok(Mode::Timer),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

/// Commands understood by every mode. A command that means nothing in the
/// active mode is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    /// The start/stop button.
    Toggle,
    Reset,
    Lap,
    /// Acknowledge a completed countdown.
    Stop,
    Adjust { delta_ms: i64 },
    SetDuration { duration_ms: u64 },
    ToggleSound,
}

/// Refresh period of each mode's tick task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCadence {
    pub clock: Duration,
    pub stopwatch: Duration,
    pub timer: Duration,
}

impl Default for TickCadence {
    fn default() -> Self {
        Self {
            clock: Duration::from_millis(1_000),
            stopwatch: Duration::from_millis(10),
            timer: Duration::from_millis(100),
        }
    }
}

impl TickCadence {
    pub fn for_mode(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Clock => self.clock,
            Mode::Stopwatch => self.stopwatch,
            Mode::Timer => self.timer,
        }
    }
}

/// Everything a controller needs besides the time source.
#[derive(Debug, Clone)]
pub struct DeckSettings {
    pub start_mode: Mode,
    pub sampler: ClockSampler,
    pub presets: Vec<TimerPreset>,
    pub default_duration_ms: u64,
    pub adjust_step_ms: u64,
    pub cadence: TickCadence,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            start_mode: Mode::Clock,
            sampler: ClockSampler::default(),
            presets: default_presets(),
            default_duration_ms: DEFAULT_DURATION_MS,
            adjust_step_ms: 60_000,
            cadence: TickCadence::default(),
        }
    }
}

#[derive(Debug, Clone)]
enum ModeState {
    Clock(Option<ClockSample>),
    Stopwatch(Stopwatch),
    Timer(CountdownTimer),
}

/// What a front end needs to draw the active mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub mode: Mode,
    pub title: String,
    pub readout: String,
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockSample>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub laps: Vec<LapRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_phase: Option<TimerPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_preset: Option<String>,
    pub sound_enabled: bool,
}

pub struct ModeController {
    time: Arc<dyn TimeSource>,
    settings: DeckSettings,
    state: ModeState,
    alerts: AlertDispatcher,
    last_alert: Option<AlertOutcome>,
}

impl fmt::Debug for ModeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeController")
            .field("mode", &self.mode())
            .field("state", &self.state)
            .field("alerts", &self.alerts)
            .finish()
    }
}

impl ModeController {
    pub fn new(time: Arc<dyn TimeSource>, settings: DeckSettings) -> Self {
        let state = fresh_state(settings.start_mode, &settings);
        Self {
            time,
            settings,
            state,
            alerts: AlertDispatcher::default(),
            last_alert: None,
        }
    }

    pub fn with_alerts(mut self, alerts: AlertDispatcher) -> Self {
        self.alerts = alerts;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        match self.state {
            ModeState::Clock(_) => Mode::Clock,
            ModeState::Stopwatch(_) => Mode::Stopwatch,
            ModeState::Timer(_) => Mode::Timer,
        }
    }

    pub fn settings(&self) -> &DeckSettings {
        &self.settings
    }

    pub fn stopwatch(&self) -> Option<&Stopwatch> {
        match &self.state {
            ModeState::Stopwatch(sw) => Some(sw),
            _ => None,
        }
    }

    pub fn timer(&self) -> Option<&CountdownTimer> {
        match &self.state {
            ModeState::Timer(t) => Some(t),
            _ => None,
        }
    }

    pub fn alerts(&self) -> &AlertDispatcher {
        &self.alerts
    }

    /// Outcome of the most recent completion alert.
    pub fn last_alert(&self) -> Option<AlertOutcome> {
        self.last_alert
    }

    /// Whether the active mode currently needs a tick task. The clock always
    /// does; the stopwatch and countdown only while running.
    pub fn wants_ticks(&self) -> bool {
        match &self.state {
            ModeState::Clock(_) => true,
            ModeState::Stopwatch(sw) => sw.is_running(),
            ModeState::Timer(t) => t.is_running(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.cadence.for_mode(self.mode())
    }

    pub fn display(&self) -> DisplaySnapshot {
        let mode = self.mode();
        let mut snap = DisplaySnapshot {
            mode,
            title: mode.title().to_string(),
            readout: String::new(),
            running: self.wants_ticks() && mode != Mode::Clock,
            clock: None,
            laps: Vec::new(),
            timer_phase: None,
            progress: None,
            active_preset: None,
            sound_enabled: self.alerts.sound_enabled(),
        };
        match &self.state {
            ModeState::Clock(sample) => {
                let sample = sample
                    .clone()
                    .unwrap_or_else(|| self.settings.sampler.sample(self.time.now()));
                snap.readout = sample.readout();
                snap.clock = Some(sample);
            }
            ModeState::Stopwatch(sw) => {
                snap.readout = sw.readout();
                snap.laps = sw.laps().to_vec();
            }
            ModeState::Timer(t) => {
                snap.readout = t.readout();
                snap.timer_phase = Some(t.phase());
                snap.progress = Some(t.progress());
                snap.active_preset = active_preset(&self.settings.presets, t.duration_ms())
                    .map(|p| p.label.clone());
            }
        }
        snap
    }

    pub fn snapshot_event(&self) -> Event {
        let display = self.display();
        Event::StateSnapshot {
            mode: display.mode,
            readout: display.readout,
            timer_phase: display.timer_phase,
            progress: display.progress,
            at: self.time.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Activate `mode` with fresh state. Re-selecting the active mode keeps it.
    pub fn switch(&mut self, mode: Mode) -> Option<Event> {
        let from = self.mode();
        if from == mode {
            return None;
        }
        self.alerts.silence();
        self.state = fresh_state(mode, &self.settings);
        info!(%from, to = %mode, "mode switched");
        Some(Event::ModeChanged {
            from,
            to: mode,
            at: self.time.now(),
        })
    }

    pub fn apply(&mut self, command: Command) -> Option<Event> {
        let now = self.time.now();
        self.alerts.mark_interacted();

        if let Command::ToggleSound = command {
            let enabled = !self.alerts.sound_enabled();
            self.alerts.set_sound_enabled(enabled);
            return Some(Event::SoundToggled { enabled, at: now });
        }

        let event = match &mut self.state {
            ModeState::Clock(_) => None,
            ModeState::Stopwatch(sw) => match command {
                Command::Start => sw.start(now),
                Command::Pause => sw.pause(now),
                Command::Toggle => sw.toggle(now),
                Command::Reset => sw.reset(now),
                Command::Lap => sw.lap(now),
                _ => None,
            },
            ModeState::Timer(t) => match command {
                Command::Start => t.start(now),
                Command::Pause => t.pause(now),
                Command::Toggle => t.toggle(now),
                Command::Reset => t.reset(now),
                Command::Stop => t.stop(now),
                Command::Adjust { delta_ms } => t.adjust(delta_ms, now),
                Command::SetDuration { duration_ms } => t.set_duration(duration_ms, now),
                _ => None,
            },
        };
        if event.is_none() {
            debug!(?command, mode = %self.mode(), "command ignored");
        }
        self.observe(event)
    }

    /// Load a preset into the countdown. Ignored outside timer mode.
    pub fn select_preset(&mut self, label: &str) -> Result<Option<Event>, ValidationError> {
        let duration_ms = find_preset(&self.settings.presets, label)?.duration_ms;
        Ok(self.apply(Command::SetDuration { duration_ms }))
    }

    /// One adjust step up (`+1`) or down (`-1`).
    pub fn nudge(&mut self, steps: i64) -> Option<Event> {
        let step = i64::try_from(self.settings.adjust_step_ms).unwrap_or(i64::MAX);
        self.apply(Command::Adjust {
            delta_ms: step.saturating_mul(steps),
        })
    }

    /// Advance the active mode to the current instant.
    pub fn tick(&mut self) -> Option<Event> {
        let now = self.time.now();
        let event = match &mut self.state {
            ModeState::Clock(sample) => {
                *sample = Some(self.settings.sampler.sample(now));
                None
            }
            ModeState::Stopwatch(sw) => sw.tick(now),
            ModeState::Timer(t) => t.tick(now),
        };
        self.observe(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn observe(&mut self, event: Option<Event>) -> Option<Event> {
        match &event {
            Some(Event::TimerCompleted { duration_ms, at }) => {
                let alert = CompletionAlert::timer_complete(*duration_ms, *at);
                self.last_alert = Some(self.alerts.dispatch(&alert));
            }
            Some(Event::TimerAcknowledged { .. }) | Some(Event::TimerReset { .. }) => {
                self.alerts.silence();
            }
            _ => {}
        }
        event
    }
}

fn fresh_state(mode: Mode, settings: &DeckSettings) -> ModeState {
    match mode {
        Mode::Clock => ModeState::Clock(None),
        Mode::Stopwatch => ModeState::Stopwatch(Stopwatch::new()),
        Mode::Timer => ModeState::Timer(CountdownTimer::new(settings.default_duration_ms)),
    }
}
