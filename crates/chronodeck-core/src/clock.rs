//! Wall-clock sampler.
//!
//! Nothing is accumulated between ticks: every sample re-reads the time
//! source, so a drifting tick cadence never drifts the displayed time.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Long calendar date, e.g. `Friday, October 16, 2026`.
pub const DEFAULT_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// One reading of the clock. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSample {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Calendar date in the sampler's date format.
    pub date: String,
    /// Resolved timezone name.
    pub timezone: String,
}

impl ClockSample {
    /// Zero-padded `(HH, MM, SS)` display fields.
    pub fn fields(&self) -> (String, String, String) {
        (
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        )
    }

    pub fn readout(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Which zone the clock displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockZone {
    /// The host's local zone.
    Local,
    /// A fixed offset with an explicit display name.
    Fixed { offset: FixedOffset, label: String },
}

#[derive(Debug, Clone)]
pub struct ClockSampler {
    zone: ClockZone,
    date_format: String,
    timezone_label: Option<String>,
}

impl Default for ClockSampler {
    fn default() -> Self {
        Self::new(ClockZone::Local)
    }
}

impl ClockSampler {
    pub fn new(zone: ClockZone) -> Self {
        Self {
            zone,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timezone_label: None,
        }
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Override the resolved timezone name.
    pub fn with_timezone_label(mut self, label: Option<String>) -> Self {
        self.timezone_label = label.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn sample(&self, now: DateTime<Utc>) -> ClockSample {
        match &self.zone {
            ClockZone::Local => {
                let local = now.with_timezone(&Local);
                let label = self
                    .timezone_label
                    .clone()
                    .unwrap_or_else(|| local_zone_name(local.offset().fix()));
                self.build(&local, label)
            }
            ClockZone::Fixed { offset, label } => {
                let fixed = now.with_timezone(offset);
                let label = self.timezone_label.clone().unwrap_or_else(|| label.clone());
                self.build(&fixed, label)
            }
        }
    }

    fn build<Tz: TimeZone>(&self, at: &DateTime<Tz>, timezone: String) -> ClockSample
    where
        Tz::Offset: std::fmt::Display,
    {
        ClockSample {
            hours: at.hour(),
            minutes: at.minute(),
            seconds: at.second(),
            date: format_date(at, &self.date_format),
            timezone,
        }
    }
}

/// Format a date, falling back to the default pattern when the configured
/// one is not a valid strftime string.
fn format_date<Tz: TimeZone>(at: &DateTime<Tz>, pattern: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    if write!(out, "{}", at.format(pattern)).is_ok() {
        return out;
    }
    tracing::warn!(pattern, "invalid date format, using default");
    at.format(DEFAULT_DATE_FORMAT).to_string()
}

/// Name of the host zone: `TZ` when set, then the system's IANA zone, else
/// the UTC offset.
fn local_zone_name(offset: FixedOffset) -> String {
    let system = match iana_time_zone::get_timezone() {
        Ok(name) => Some(name),
        Err(e) => {
            tracing::debug!(error = %e, "system timezone name unavailable");
            None
        }
    };
    resolve_zone_name(std::env::var("TZ").ok(), system, offset)
}

fn resolve_zone_name(tz: Option<String>, system: Option<String>, offset: FixedOffset) -> String {
    let named = |name: Option<String>| name.filter(|n| !n.trim().is_empty());
    named(tz.map(|tz| tz.trim_start_matches(':').to_string()))
        .or_else(|| named(system))
        .unwrap_or_else(|| offset_label(offset))
}

/// `UTC`, `UTC+02:00`, `UTC-05:30`.
pub fn offset_label(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        return "UTC".into();
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}
