//! Terminal rendering and the terminal-side alert channels.

use std::io::{self, Write};

use chronodeck_core::format::format_stopwatch;
use chronodeck_core::{
    CompletionAlert, CompletionNotifier, DisplaySnapshot, Event, LapRecord, Mode, NotifyError,
    TimerPhase,
};

/// Width of the progress bar drawn under a countdown.
const BAR_WIDTH: usize = 30;

/// One status line for the active mode.
pub fn status_line(display: &DisplaySnapshot) -> String {
    match display.mode {
        Mode::Clock => match &display.clock {
            Some(sample) => format!(
                "{}  {}  [{}]",
                display.readout, sample.date, sample.timezone
            ),
            None => display.readout.clone(),
        },
        Mode::Stopwatch => {
            let state = if display.running { "running" } else { "paused" };
            match display.laps.first() {
                Some(lap) => format!(
                    "{}  ({state}, {} +{})",
                    display.readout,
                    lap.label(),
                    format_stopwatch(lap.delta_ms)
                ),
                None => format!("{}  ({state})", display.readout),
            }
        }
        Mode::Timer => {
            let phase = match display.timer_phase {
                Some(TimerPhase::Running) => "running",
                Some(TimerPhase::Complete) => "COMPLETE",
                _ => "idle",
            };
            let preset = display
                .active_preset
                .as_deref()
                .map(|p| format!(" [{p}]"))
                .unwrap_or_default();
            format!(
                "{}  {}  {phase}{preset}",
                display.readout,
                progress_bar(display.progress.unwrap_or(0.0))
            )
        }
    }
}

/// `[#########.....]` with the filled share equal to `fraction`.
pub fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Lap table, most recent first.
pub fn lap_table(laps: &[LapRecord]) -> String {
    let mut out = String::from("LAP      SPLIT        TOTAL\n");
    for lap in laps {
        out.push_str(&format!(
            "{:<8} +{:<11} {}\n",
            format!("{:02}", lap.index),
            format_stopwatch(lap.delta_ms),
            format_stopwatch(lap.cumulative_ms)
        ));
    }
    out
}

/// Human-readable line for an event, or `None` for events that only change
/// the readout.
pub fn event_line(event: &Event) -> Option<String> {
    match event {
        Event::ModeChanged { to, .. } => Some(mode_header(*to)),
        Event::LapRecorded { lap, .. } => Some(format!(
            "{}  +{}  {}",
            lap.label(),
            format_stopwatch(lap.delta_ms),
            format_stopwatch(lap.cumulative_ms)
        )),
        Event::TimerCompleted { .. } => None,
        Event::TimerAcknowledged { .. } => Some("alarm stopped".into()),
        Event::SoundToggled { enabled, .. } => {
            Some(format!("sound {}", if *enabled { "on" } else { "off" }))
        }
        _ => None,
    }
}

/// Navigation row with the active mode bracketed: `[Clock]  Stopwatch  Timer`.
pub fn mode_bar(active: Mode) -> String {
    Mode::ALL
        .iter()
        .map(|&mode| {
            if mode == active {
                format!("[{}]", mode.label())
            } else {
                mode.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Mode bar followed by the active mode's heading.
pub fn mode_header(active: Mode) -> String {
    format!("{}   == {} ==", mode_bar(active), active.title())
}

/// Redraw the current terminal line in place.
pub fn redraw(line: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\r\x1b[2K{line}")?;
    out.flush()
}

/// Print a full line, clearing any in-place readout first.
pub fn println_clear(line: &str) {
    println!("\r\x1b[2K{line}");
}

/// Visual alert: a banner on stdout, or a plain line on stderr when stdout
/// carries JSON.
#[derive(Debug, Default)]
pub struct TerminalBanner {
    json: bool,
}

impl TerminalBanner {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn line(alert: &CompletionAlert) -> String {
        format!("*** {} *** {}", alert.title, alert.description)
    }
}

impl CompletionNotifier for TerminalBanner {
    fn channel(&self) -> &str {
        "banner"
    }

    fn notify(&mut self, alert: &CompletionAlert) -> Result<(), NotifyError> {
        if self.json {
            eprintln!("{}", Self::line(alert));
        } else {
            println_clear(&Self::line(alert));
        }
        Ok(())
    }
}

/// Audible alert: the terminal bell.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl CompletionNotifier for TerminalBell {
    fn channel(&self) -> &str {
        "bell"
    }

    fn notify(&mut self, _alert: &CompletionAlert) -> Result<(), NotifyError> {
        let mut err = io::stderr().lock();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|source| NotifyError::Delivery {
                channel: "bell".into(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer_display(progress: f64) -> DisplaySnapshot {
        DisplaySnapshot {
            mode: Mode::Timer,
            title: Mode::Timer.title().into(),
            readout: "02:30".into(),
            running: true,
            clock: None,
            laps: Vec::new(),
            timer_phase: Some(TimerPhase::Running),
            progress: Some(progress),
            active_preset: None,
            sound_enabled: true,
        }
    }

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), format!("[{}]", ".".repeat(30)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(30)));
        assert_eq!(progress_bar(2.0), progress_bar(1.0));
        assert_eq!(progress_bar(0.5).matches('#').count(), 15);
    }

    #[test]
    fn timer_status_line() {
        let line = status_line(&timer_display(0.5));
        assert!(line.starts_with("02:30  ["));
        assert!(line.ends_with("running"));
    }

    #[test]
    fn mode_bar_brackets_active_mode() {
        assert_eq!(mode_bar(Mode::Clock), "[Clock]  Stopwatch  Timer");
        assert_eq!(mode_bar(Mode::Timer), "Clock  Stopwatch  [Timer]");
        assert!(mode_header(Mode::Timer).ends_with("== Countdown Timer =="));
    }

    #[test]
    fn mode_change_prints_header() {
        let event: Event = serde_json::from_str(
            r#"{"type":"ModeChanged","from":"clock","to":"stopwatch","at":"2026-10-16T07:05:09Z"}"#,
        )
        .unwrap();
        assert_eq!(event_line(&event), Some(mode_header(Mode::Stopwatch)));
    }

    #[test]
    fn lap_table_lists_most_recent_first() {
        let laps = [
            LapRecord { index: 2, cumulative_ms: 800, delta_ms: 300 },
            LapRecord { index: 1, cumulative_ms: 500, delta_ms: 500 },
        ];
        let table = lap_table(&laps);
        let rows: Vec<_> = table.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("02"));
        assert!(rows[0].contains("+00:00.30"));
        assert!(rows[1].ends_with("00:00.50"));
    }
}
