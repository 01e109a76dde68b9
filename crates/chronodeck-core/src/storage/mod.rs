mod config;

pub use config::{
    AlertsConfig, ClockConfig, Config, GeneralConfig, StopwatchConfig, TimerConfig,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/chronodeck[-dev]/` based on CHRONODECK_ENV.
///
/// Set CHRONODECK_ENV=dev to use the development directory, or
/// CHRONODECK_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = resolve_data_dir(
        std::env::var_os("CHRONODECK_CONFIG_DIR").map(PathBuf::from),
        dirs::home_dir(),
        std::env::var("CHRONODECK_ENV").ok().as_deref(),
    );

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

fn resolve_data_dir(
    override_dir: Option<PathBuf>,
    home: Option<PathBuf>,
    env: Option<&str>,
) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    let base_dir = home.unwrap_or_else(|| PathBuf::from(".")).join(".config");
    if env == Some("dev") {
        base_dir.join("chronodeck-dev")
    } else {
        base_dir.join("chronodeck")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dot_config_under_home() {
        let home = PathBuf::from("/home/ada");
        assert_eq!(
            resolve_data_dir(None, Some(home.clone()), None),
            PathBuf::from("/home/ada/.config/chronodeck")
        );
        assert_eq!(
            resolve_data_dir(None, Some(home), Some("dev")),
            PathBuf::from("/home/ada/.config/chronodeck-dev")
        );
    }

    #[test]
    fn override_wins_unless_empty() {
        let home = Some(PathBuf::from("/home/ada"));
        assert_eq!(
            resolve_data_dir(Some(PathBuf::from("/tmp/deck")), home.clone(), Some("dev")),
            PathBuf::from("/tmp/deck")
        );
        assert_eq!(
            resolve_data_dir(Some(PathBuf::new()), home, None),
            PathBuf::from("/home/ada/.config/chronodeck")
        );
    }
}
