//! Countdown presets.

use serde::{Deserialize, Serialize};

use crate::countdown::MAX_DURATION_MS;
use crate::error::ValidationError;
use crate::format::{duration_label, MS_PER_HOUR, MS_PER_MINUTE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPreset {
    pub label: String,
    pub duration_ms: u64,
}

impl TimerPreset {
    pub fn new(label: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            label: label.into(),
            duration_ms,
        }
    }

    /// Build a preset labelled after its own duration (`90s`, `5m`, `1h`).
    pub fn from_duration(duration_ms: u64) -> Self {
        Self::new(duration_label(duration_ms), duration_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "label".into(),
                message: "preset label must not be empty".into(),
            });
        }
        if self.duration_ms == 0 || self.duration_ms > MAX_DURATION_MS {
            return Err(ValidationError::InvalidValue {
                field: format!("presets.{}", self.label),
                message: format!("duration must be within 1ms..={MAX_DURATION_MS}ms"),
            });
        }
        Ok(())
    }
}

/// 1m, 5m, 10m, 15m, 30m, 1h.
pub fn default_presets() -> Vec<TimerPreset> {
    [
        MS_PER_MINUTE,
        5 * MS_PER_MINUTE,
        10 * MS_PER_MINUTE,
        15 * MS_PER_MINUTE,
        30 * MS_PER_MINUTE,
        MS_PER_HOUR,
    ]
    .into_iter()
    .map(TimerPreset::from_duration)
    .collect()
}

/// Case-insensitive label lookup.
pub fn find_preset<'a>(
    presets: &'a [TimerPreset],
    label: &str,
) -> Result<&'a TimerPreset, ValidationError> {
    presets
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(label.trim()))
        .ok_or_else(|| ValidationError::UnknownPreset(label.to_string()))
}

/// The preset whose duration equals the current countdown duration, if any.
pub fn active_preset(presets: &[TimerPreset], duration_ms: u64) -> Option<&TimerPreset> {
    presets.iter().find(|p| p.duration_ms == duration_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_preset_row() {
        let labels: Vec<_> = default_presets().into_iter().map(|p| p.label).collect();
        assert_eq!(labels, ["1m", "5m", "10m", "15m", "30m", "1h"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let presets = default_presets();
        assert_eq!(find_preset(&presets, "1H").unwrap().duration_ms, 3_600_000);
        assert_eq!(
            find_preset(&presets, "7m"),
            Err(ValidationError::UnknownPreset("7m".into()))
        );
    }

    #[test]
    fn active_preset_tracks_duration() {
        let presets = default_presets();
        assert_eq!(active_preset(&presets, 300_000).map(|p| p.label.as_str()), Some("5m"));
        assert!(active_preset(&presets, 301_000).is_none());
    }

    #[test]
    fn validation_rejects_zero_and_oversized() {
        assert!(TimerPreset::new("zero", 0).validate().is_err());
        assert!(TimerPreset::new("huge", MAX_DURATION_MS + 1).validate().is_err());
        assert!(TimerPreset::new(" ", 1_000).validate().is_err());
        assert!(TimerPreset::from_duration(MAX_DURATION_MS).validate().is_ok());
    }
}
