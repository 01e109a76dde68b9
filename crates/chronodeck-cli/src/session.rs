//! Interactive session loop shared by the clock, stopwatch, timer and deck
//! commands.
//!
//! In JSON mode stdout carries only JSON lines: every event, plus a
//! `StateSnapshot` whenever the displayed second, mode or countdown phase
//! changes. Banners, help and input errors go to stderr instead.

use std::error::Error;
use std::sync::Arc;

use chronodeck_core::{
    AlertDispatcher, Config, Deck, DeckUpdate, DisplaySnapshot, Event, Mode, ModeController,
    SystemTimeSource, TimerPhase,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::input::{self, Input, HELP};
use crate::render::{self, TerminalBanner, TerminalBell};

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Print JSON lines instead of drawing a readout.
    pub json: bool,
    /// Leave the loop when a countdown completes.
    pub exit_on_complete: bool,
    /// Allow `m <mode>` to switch modes.
    pub allow_switch: bool,
    /// Read commands from stdin.
    pub interactive: bool,
}

/// Build a controller from the user's config, wired to terminal alerts.
pub fn build_controller(
    config: &Config,
    mode: Mode,
    sound: bool,
    json: bool,
) -> Result<ModeController, Box<dyn Error>> {
    let mut settings = config.deck_settings()?;
    settings.start_mode = mode;

    let mut alerts = AlertDispatcher::new(Box::new(TerminalBanner::new(json)));
    if config.alerts.bell {
        alerts = alerts.with_audible(Box::new(TerminalBell));
    }
    alerts.set_sound_enabled(sound && config.alerts.sound_enabled);
    // Launching a command from the terminal counts as interaction.
    alerts.mark_interacted();

    Ok(ModeController::new(Arc::new(SystemTimeSource), settings).with_alerts(alerts))
}

pub async fn run(
    deck: &mut Deck,
    updates: &mut UnboundedReceiver<DeckUpdate>,
    opts: SessionOptions,
) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = opts.interactive;
    let mut out = Output::new(opts.json);

    // Events from commands issued before the session started come first.
    while let Ok(update) = updates.try_recv() {
        if let DeckUpdate::Event(event) = update {
            out.event(&event)?;
        }
    }
    deck.resume();
    if !opts.json {
        render::println_clear(&render::mode_header(deck.mode()));
    }
    out.frame(deck, &deck.display())?;

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                match update {
                    DeckUpdate::Frame(frame) => out.frame(deck, &frame)?,
                    DeckUpdate::Event(event) => {
                        out.event(&event)?;
                        if opts.exit_on_complete && event.is_completion() {
                            break;
                        }
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    stdin_open = false;
                    continue;
                };
                match input::parse(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle(deck, input, opts, &out),
                    Err(message) => out.notice(&message),
                }
                out.frame(deck, &deck.display())?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    deck.shutdown();
    // Flush events published by the final command.
    while let Ok(update) = updates.try_recv() {
        if let DeckUpdate::Event(event) = update {
            out.event(&event)?;
        }
    }
    if !opts.json {
        println!();
    }
    Ok(())
}

fn handle(deck: &mut Deck, input: Input, opts: SessionOptions, out: &Output) {
    match input {
        Input::Command(command) => {
            deck.command(command);
        }
        Input::Nudge(steps) => {
            deck.nudge(steps);
        }
        Input::Preset(label) => {
            if let Err(e) = deck.select_preset(&label) {
                out.notice(&e.to_string());
            }
        }
        Input::Switch(mode) if opts.allow_switch => {
            deck.switch(mode);
        }
        Input::Switch(_) => out.notice("mode switching is only available in `deck`"),
        Input::Help => out.notice(HELP),
        Input::Quit => {}
    }
}

/// Where session output goes: an in-place readout on a terminal, or JSON
/// lines on stdout.
struct Output {
    json: bool,
    snapshots: SnapshotFilter,
}

impl Output {
    fn new(json: bool) -> Self {
        Self {
            json,
            snapshots: SnapshotFilter::default(),
        }
    }

    fn frame(&mut self, deck: &Deck, frame: &DisplaySnapshot) -> Result<(), Box<dyn Error>> {
        if !self.json {
            render::redraw(&render::status_line(frame))?;
        } else if self.snapshots.admit(frame) {
            let snapshot = deck.with_controller(ModeController::snapshot_event);
            println!("{}", serde_json::to_string(&snapshot)?);
        }
        Ok(())
    }

    fn event(&self, event: &Event) -> Result<(), Box<dyn Error>> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
        } else if let Some(line) = render::event_line(event) {
            render::println_clear(&line);
        }
        Ok(())
    }

    fn notice(&self, message: &str) {
        if self.json {
            eprintln!("{message}");
        } else {
            render::println_clear(message);
        }
    }
}

/// Passes one frame per displayed second, plus any mode or phase change.
/// Stopwatch centiseconds are ignored.
#[derive(Debug, Default)]
struct SnapshotFilter {
    last: Option<(Mode, Option<TimerPhase>, String)>,
}

impl SnapshotFilter {
    fn admit(&mut self, frame: &DisplaySnapshot) -> bool {
        let whole = frame.readout.split('.').next().unwrap_or_default();
        let key = (frame.mode, frame.timer_phase, whole.to_string());
        if self.last.as_ref() == Some(&key) {
            return false;
        }
        self.last = Some(key);
        true
    }
}
