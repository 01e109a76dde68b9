//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The mode shown on launch
//! - Clock date format and timezone label
//! - Tick cadence per mode
//! - Countdown default duration, adjust step and presets
//! - Alert preferences
//!
//! Configuration is stored at `~/.config/chronodeck/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::clock::{ClockSampler, ClockZone, DEFAULT_DATE_FORMAT};
use crate::countdown::{clamp_duration, DEFAULT_DURATION_MS};
use crate::error::{ConfigError, CoreError};
use crate::mode::{DeckSettings, Mode, TickCadence};
use crate::presets::{default_presets, TimerPreset};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_mode")]
    pub default_mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Overrides the detected timezone name.
    #[serde(default)]
    pub timezone_label: Option<String>,
    #[serde(default = "default_clock_tick")]
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwatchConfig {
    #[serde(default = "default_stopwatch_tick")]
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_duration")]
    pub default_duration_ms: u64,
    #[serde(default = "default_adjust_step")]
    pub adjust_step_ms: u64,
    #[serde(default = "default_timer_tick")]
    pub tick_ms: u64,
    #[serde(default = "default_presets")]
    pub presets: Vec<TimerPreset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Ring the terminal bell on completion.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/chronodeck/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub stopwatch: StopwatchConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

// Default functions
fn default_mode() -> String {
    "clock".into()
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.into()
}
fn default_clock_tick() -> u64 {
    1_000
}
fn default_stopwatch_tick() -> u64 {
    10
}
fn default_timer_tick() -> u64 {
    100
}
fn default_duration() -> u64 {
    DEFAULT_DURATION_MS
}
fn default_adjust_step() -> u64 {
    60_000
}
fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            timezone_label: None,
            tick_ms: default_clock_tick(),
        }
    }
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_stopwatch_tick(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration(),
            adjust_step_ms: default_adjust_step(),
            tick_ms: default_timer_tick(),
            presets: default_presets(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            bell: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Optional strings are stored as null until first set.
                    serde_json::Value::Null if value.is_empty() => serde_json::Value::Null,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing and returning the default when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    /// Get a config value as string by dot-separated key. Unset optional
    /// values read as an empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the key's type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Check values that parse fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general
            .default_mode
            .parse::<Mode>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "general.default_mode".into(),
                message: e.to_string(),
            })?;
        for (key, tick) in [
            ("clock.tick_ms", self.clock.tick_ms),
            ("stopwatch.tick_ms", self.stopwatch.tick_ms),
            ("timer.tick_ms", self.timer.tick_ms),
        ] {
            if tick == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "tick interval must be at least 1ms".into(),
                });
            }
        }
        for preset in &self.timer.presets {
            preset.validate().map_err(|e| ConfigError::InvalidValue {
                key: "timer.presets".into(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Settings for a mode controller built from this configuration.
    pub fn deck_settings(&self) -> Result<DeckSettings, CoreError> {
        self.validate()?;
        let start_mode = self.general.default_mode.parse::<Mode>()?;
        let sampler = ClockSampler::new(ClockZone::Local)
            .with_date_format(self.clock.date_format.clone())
            .with_timezone_label(self.clock.timezone_label.clone());
        Ok(DeckSettings {
            start_mode,
            sampler,
            presets: self.timer.presets.clone(),
            default_duration_ms: clamp_duration(self.timer.default_duration_ms),
            adjust_step_ms: self.timer.adjust_step_ms,
            cadence: TickCadence {
                clock: Duration::from_millis(self.clock.tick_ms),
                stopwatch: Duration::from_millis(self.stopwatch.tick_ms),
                timer: Duration::from_millis(self.timer.tick_ms),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.default_duration_ms, 300_000);
        assert_eq!(parsed.timer.presets.len(), 6);
        assert!(parsed.alerts.sound_enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nadjust_step_ms = 30000\n").unwrap();
        assert_eq!(parsed.timer.adjust_step_ms, 30_000);
        assert_eq!(parsed.timer.tick_ms, 100);
        assert_eq!(parsed.general.default_mode, "clock");
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.default_duration_ms").as_deref(), Some("300000"));
        assert_eq!(cfg.get("alerts.bell").as_deref(), Some("true"));
        assert_eq!(cfg.get("general.default_mode").as_deref(), Some("clock"));
        assert!(cfg.get("timer.nope").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn get_unset_optional_is_empty() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get("clock.timezone_label").as_deref(), Some(""));
        cfg.set_value("clock.timezone_label", "CET").unwrap();
        assert_eq!(cfg.get("clock.timezone_label").as_deref(), Some("CET"));
    }

    #[test]
    fn set_value_keeps_types() {
        let mut cfg = Config::default();
        cfg.set_value("timer.adjust_step_ms", "30000").unwrap();
        cfg.set_value("alerts.sound_enabled", "false").unwrap();
        cfg.set_value("clock.timezone_label", "CET").unwrap();
        assert_eq!(cfg.timer.adjust_step_ms, 30_000);
        assert!(!cfg.alerts.sound_enabled);
        assert_eq!(cfg.clock.timezone_label.as_deref(), Some("CET"));
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("timer.missing", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("timer.tick_ms", "fast"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set_value("timer.tick_ms", "0").is_err());
        assert!(cfg.set_value("general.default_mode", "alarm").is_err());
        assert_eq!(cfg.timer.tick_ms, 100, "failed sets leave config untouched");
    }

    #[test]
    fn presets_can_be_replaced_as_json() {
        let mut cfg = Config::default();
        cfg.set_value(
            "timer.presets",
            r#"[{"label":"tea","duration_ms":180000}]"#,
        )
        .unwrap();
        assert_eq!(cfg.timer.presets, vec![TimerPreset::new("tea", 180_000)]);
    }

    #[test]
    fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.stopwatch.tick_ms, 10);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set_value("general.default_mode", "timer").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.general.default_mode, "timer");
    }

    #[test]
    fn garbage_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = 3 = 4").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn deck_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.set_value("general.default_mode", "stopwatch").unwrap();
        cfg.set_value("timer.default_duration_ms", "999999999").unwrap();
        cfg.set_value("stopwatch.tick_ms", "20").unwrap();
        let settings = cfg.deck_settings().unwrap();
        assert_eq!(settings.start_mode, Mode::Stopwatch);
        assert_eq!(settings.default_duration_ms, crate::countdown::MAX_DURATION_MS);
        assert_eq!(settings.cadence.stopwatch, Duration::from_millis(20));
    }
}
