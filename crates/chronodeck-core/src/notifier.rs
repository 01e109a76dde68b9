//! Completion alerts.
//!
//! The countdown only signals completion; delivering the alert is up to
//! [`CompletionNotifier`] implementations supplied by the front end. The
//! [`AlertDispatcher`] always shows the visual alert and adds the audible one
//! when sound is enabled and the user has interacted with the deck. A failed
//! audible alert degrades to an extra visual hint and never reaches the timer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::NotifyError;
use crate::format::duration_label;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionAlert {
    pub title: String,
    pub description: String,
    pub duration_ms: u64,
    pub at: DateTime<Utc>,
}

impl CompletionAlert {
    pub fn timer_complete(duration_ms: u64, at: DateTime<Utc>) -> Self {
        Self {
            title: "Timer Complete!".into(),
            description: format!(
                "Your {} countdown has finished.",
                duration_label(duration_ms)
            ),
            duration_ms,
            at,
        }
    }

    fn sound_unavailable(&self) -> Self {
        Self {
            title: self.title.clone(),
            description: "Sound could not play. Interact with the deck to enable audible alerts."
                .into(),
            duration_ms: self.duration_ms,
            at: self.at,
        }
    }
}

/// A channel that can deliver a completion alert.
pub trait CompletionNotifier: Send {
    /// Short channel name for logs.
    fn channel(&self) -> &str;

    fn notify(&mut self, alert: &CompletionAlert) -> Result<(), NotifyError>;

    /// Stop any ongoing alert (a looping sound, a blinking banner).
    fn silence(&mut self) {}
}

/// Visual fallback that only logs.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl CompletionNotifier for TracingNotifier {
    fn channel(&self) -> &str {
        "log"
    }

    fn notify(&mut self, alert: &CompletionAlert) -> Result<(), NotifyError> {
        info!(title = %alert.title, description = %alert.description, "completion alert");
        Ok(())
    }
}

/// What actually reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertOutcome {
    Visual,
    VisualAndAudible,
    /// Audible delivery failed; the user got a visual hint instead.
    Degraded,
}

pub struct AlertDispatcher {
    visual: Box<dyn CompletionNotifier>,
    audible: Option<Box<dyn CompletionNotifier>>,
    sound_enabled: bool,
    interacted: bool,
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::new(Box::new(TracingNotifier))
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("visual", &self.visual.channel())
            .field("audible", &self.audible.as_ref().map(|a| a.channel().to_string()))
            .field("sound_enabled", &self.sound_enabled)
            .field("interacted", &self.interacted)
            .finish()
    }
}

impl AlertDispatcher {
    pub fn new(visual: Box<dyn CompletionNotifier>) -> Self {
        Self {
            visual,
            audible: None,
            sound_enabled: true,
            interacted: false,
        }
    }

    pub fn with_audible(mut self, audible: Box<dyn CompletionNotifier>) -> Self {
        self.audible = Some(audible);
        self
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        if !enabled {
            if let Some(audible) = self.audible.as_mut() {
                audible.silence();
            }
        }
    }

    pub fn has_interacted(&self) -> bool {
        self.interacted
    }

    /// Record that the user interacted; audible alerts are held back until then.
    pub fn mark_interacted(&mut self) {
        self.interacted = true;
    }

    pub fn dispatch(&mut self, alert: &CompletionAlert) -> AlertOutcome {
        let mut outcome = AlertOutcome::Visual;

        if self.sound_enabled && self.interacted {
            if let Some(audible) = self.audible.as_mut() {
                match audible.notify(alert) {
                    Ok(()) => outcome = AlertOutcome::VisualAndAudible,
                    Err(e) => {
                        warn!(channel = audible.channel(), error = %e, "audible alert failed");
                        outcome = AlertOutcome::Degraded;
                    }
                }
            }
        }

        if outcome == AlertOutcome::Degraded {
            self.deliver_visual(&alert.sound_unavailable());
        }
        self.deliver_visual(alert);
        outcome
    }

    pub fn silence(&mut self) {
        self.visual.silence();
        if let Some(audible) = self.audible.as_mut() {
            audible.silence();
        }
    }

    fn deliver_visual(&mut self, alert: &CompletionAlert) {
        if let Err(e) = self.visual.notify(alert) {
            warn!(channel = self.visual.channel(), error = %e, "visual alert failed");
        }
    }
}
