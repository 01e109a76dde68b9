//! # Chronodeck Core Library
//!
//! This library provides the timekeeping logic behind Chronodeck, a
//! three-mode digital readout deck (clock, stopwatch, countdown timer).
//! Front ends such as the `chronodeck` CLI only render what the core hands
//! them and forward user commands.
//!
//! ## Architecture
//!
//! - **Engines**: wall-clock based state machines ([`Stopwatch`],
//!   [`CountdownTimer`], [`ClockSampler`]) that take the current instant as
//!   an argument and never spawn anything
//! - **Mode controller**: owns the active mode's state and exposes one
//!   command surface for all modes
//! - **Runtime**: [`Deck`] drives the controller from a cancellable tick task
//! - **Alerts**: [`AlertDispatcher`] fans a countdown completion out to
//!   front-end supplied notifiers
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ModeController`]: mode selection, commands and display snapshots
//! - [`TimeSource`]: injectable clock, with a manual one for tests
//! - [`Config`]: application configuration management

pub mod clock;
pub mod countdown;
pub mod error;
pub mod events;
pub mod format;
pub mod mode;
pub mod notifier;
pub mod presets;
pub mod runtime;
pub mod stopwatch;
pub mod storage;
pub mod ticker;
pub mod time_source;

pub use clock::{ClockSample, ClockSampler, ClockZone};
pub use countdown::{CountdownTimer, TimerPhase, MAX_DURATION_MS};
pub use error::{ConfigError, CoreError, NotifyError, ValidationError};
pub use events::Event;
pub use format::{format_countdown, format_stopwatch, parse_duration};
pub use mode::{Command, DeckSettings, DisplaySnapshot, Mode, ModeController, TickCadence};
pub use notifier::{AlertDispatcher, AlertOutcome, CompletionAlert, CompletionNotifier};
pub use presets::TimerPreset;
pub use runtime::{Deck, DeckUpdate};
pub use stopwatch::{LapRecord, Stopwatch};
pub use storage::Config;
pub use ticker::{spawn_repeating, TickHandle};
pub use time_source::{ManualTimeSource, MonotonicTimeSource, SystemTimeSource, TimeSource};
