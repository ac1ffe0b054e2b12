//! Runtime settings
//!
//! Settings are read from `~/.config/vignette/settings.toml`. Every section
//! and field is optional; anything missing takes its default.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use vignette_core::TimeConfig;

/// All runtime settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub time: TimeConfig,
    pub run: RunSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vignette"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Read settings from disk.
    ///
    /// Runs before logging is installed, so it reports instead of logging:
    /// `Ok(None)` when there is no settings file, `Err` when it is unreadable.
    pub fn try_load() -> anyhow::Result<Option<(Self, PathBuf)>> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse settings file {:?}", path))?;
        Ok(Some((settings, path)))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Headless frame driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Zone file loaded at startup
    pub zone: PathBuf,
    /// Stop after this many frames (0 = until the state stack empties)
    pub max_frames: u64,
    /// Seconds per frame
    pub fixed_delta: f32,
    /// Sleep between frames and feed measured time instead of `fixed_delta`
    pub realtime: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            zone: PathBuf::from("assets/zones/intro.json"),
            max_frames: 0,
            fixed_delta: 1.0 / 60.0,
            realtime: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let settings = Settings::from_toml("").expect("empty toml");
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.run.max_frames, 0);
        assert_eq!(settings.time.time_scale, 1.0);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let settings = Settings::from_toml(
            r#"
            [time]
            time_scale = 2.0

            [run]
            zone = "zones/dock.json"
            realtime = false

            [log]
            level = "debug,vignette_ecs=warn"
            "#,
        )
        .expect("valid toml");
        assert_eq!(settings.time.time_scale, 2.0);
        assert_eq!(settings.time.max_delta_time, 0.25);
        assert_eq!(settings.run.zone, PathBuf::from("zones/dock.json"));
        assert!(!settings.run.realtime);
        assert!((settings.run.fixed_delta - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(settings.log.level, "debug,vignette_ecs=warn");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Settings::from_toml("[run]\nmax_frames = \"lots\"").is_err());
    }
}
