//! Async driver that owns the active mode's tick task.
//!
//! The [`Deck`] keeps at most one tick task alive. After every command it
//! reconciles the task with [`ModeController::wants_ticks`]: a paused
//! stopwatch or countdown releases its task, and a mode switch cancels the
//! outgoing task before the new mode's state exists.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ValidationError;
use crate::events::Event;
use crate::mode::{Command, DisplaySnapshot, Mode, ModeController};
use crate::ticker::{spawn_repeating, TickHandle};

/// Messages pushed to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckUpdate {
    /// A state change, from a command or a tick.
    Event(Event),
    /// Fresh readout after a tick.
    Frame(DisplaySnapshot),
}

pub struct Deck {
    controller: Arc<Mutex<ModeController>>,
    updates: mpsc::UnboundedSender<DeckUpdate>,
    ticker: Option<TickHandle>,
}

impl Deck {
    /// Wrap a controller. Call [`Deck::resume`] from inside a tokio runtime
    /// to start ticking.
    pub fn new(controller: ModeController) -> (Self, mpsc::UnboundedReceiver<DeckUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let deck = Self {
            controller: Arc::new(Mutex::new(controller)),
            updates: tx,
            ticker: None,
        };
        (deck, rx)
    }

    pub fn mode(&self) -> Mode {
        lock(&self.controller).mode()
    }

    pub fn display(&self) -> DisplaySnapshot {
        lock(&self.controller).display()
    }

    pub fn ticker_active(&self) -> bool {
        self.ticker.as_ref().is_some_and(TickHandle::is_active)
    }

    /// Read access to the controller for queries the deck does not wrap.
    pub fn with_controller<R>(&self, f: impl FnOnce(&ModeController) -> R) -> R {
        f(&lock(&self.controller))
    }

    /// Start the tick task if the active mode needs one.
    pub fn resume(&mut self) {
        self.sync_ticker();
    }

    pub fn switch(&mut self, mode: Mode) -> Option<Event> {
        if let Some(mut old) = self.ticker.take() {
            old.cancel();
        }
        let event = lock(&self.controller).switch(mode);
        self.publish(event.as_ref());
        self.sync_ticker();
        event
    }

    pub fn command(&mut self, command: Command) -> Option<Event> {
        let event = lock(&self.controller).apply(command);
        self.publish(event.as_ref());
        self.sync_ticker();
        event
    }

    pub fn select_preset(&mut self, label: &str) -> Result<Option<Event>, ValidationError> {
        let event = lock(&self.controller).select_preset(label)?;
        self.publish(event.as_ref());
        self.sync_ticker();
        Ok(event)
    }

    pub fn nudge(&mut self, steps: i64) -> Option<Event> {
        let event = lock(&self.controller).nudge(steps);
        self.publish(event.as_ref());
        self.sync_ticker();
        event
    }

    /// Cancel the tick task. State is kept; `resume` restarts ticking.
    pub fn shutdown(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
            debug!("tick task cancelled on shutdown");
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish(&self, event: Option<&Event>) {
        if let Some(event) = event {
            let _ = self.updates.send(DeckUpdate::Event(event.clone()));
        }
    }

    fn sync_ticker(&mut self) {
        let (wants, period) = {
            let controller = lock(&self.controller);
            (controller.wants_ticks(), controller.tick_interval())
        };

        if !wants {
            if let Some(mut ticker) = self.ticker.take() {
                ticker.cancel();
                debug!("tick task released");
            }
            return;
        }

        let reusable = self
            .ticker
            .as_ref()
            .is_some_and(|t| t.is_active() && t.period() == period);
        if reusable {
            return;
        }

        let controller = Arc::clone(&self.controller);
        let updates = self.updates.clone();
        debug!(period_ms = period.as_millis() as u64, "tick task spawned");
        // Replacing the handle drops, and so cancels, any previous task.
        self.ticker = Some(spawn_repeating(period, move || {
            let mut controller = lock(&controller);
            let event = controller.tick();
            let frame = controller.display();
            let keep_going = controller.wants_ticks();
            drop(controller);

            if let Some(event) = event {
                let _ = updates.send(DeckUpdate::Event(event));
            }
            if updates.send(DeckUpdate::Frame(frame)).is_err() || !keep_going {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        }));
    }
}

impl Drop for Deck {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock(controller: &Mutex<ModeController>) -> MutexGuard<'_, ModeController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}
