//! TOML-based widget configuration.
//!
//! Stores the default durations for each time widget:
//! - Pomodoro phase lengths
//! - Focus session length
//! - Stopwatch and countdown redraw periods
//!
//! Configuration is stored at `~/.config/timekit/config.toml`; set
//! `TIMEKIT_CONFIG_DIR` to relocate it (tests do).
//!
//! Durations are stored signed and clamped to zero at the point of use:
//! a negative or zero length is a valid configuration that simply completes
//! immediately, never an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::timer::PomodoroPhase;

/// Pomodoro phase lengths in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_work_min")]
    pub work_min: i64,
    #[serde(default = "default_short_break_min")]
    pub short_break_min: i64,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: i64,
}

impl PomodoroConfig {
    /// Phase length in milliseconds. Negative configured values clamp to
    /// zero.
    pub fn duration_ms(&self, phase: PomodoroPhase) -> u64 {
        let min = match phase {
            PomodoroPhase::Work => self.work_min,
            PomodoroPhase::ShortBreak => self.short_break_min,
            PomodoroPhase::LongBreak => self.long_break_min,
        };
        min.max(0) as u64 * 60 * 1000
    }
}

/// Focus widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Session length in seconds; the widget offers 30 and 60.
    #[serde(default = "default_focus_secs")]
    pub default_secs: i64,
}

/// Redraw periods for the presentation poll. These only affect display
/// smoothness, never the reported times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Stopwatch face, hundredths of a second.
    #[serde(default = "default_stopwatch_poll_ms")]
    pub stopwatch_ms: u64,
    /// Countdown-style faces, whole seconds.
    #[serde(default = "default_countdown_poll_ms")]
    pub countdown_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timekit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

// Default functions
fn default_work_min() -> i64 {
    25
}
fn default_short_break_min() -> i64 {
    5
}
fn default_long_break_min() -> i64 {
    15
}
fn default_focus_secs() -> i64 {
    60
}
fn default_stopwatch_poll_ms() -> u64 {
    10
}
fn default_countdown_poll_ms() -> u64 {
    1000
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            default_secs: default_focus_secs(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            stopwatch_ms: default_stopwatch_poll_ms(),
            countdown_ms: default_countdown_poll_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pomodoro: PomodoroConfig::default(),
            focus: FocusConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

/// Returns `~/.config/timekit/`, honoring `TIMEKIT_CONFIG_DIR`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TIMEKIT_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("timekit"),
    };
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed into the key's type. Does not persist; call [`Config::save`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(())
    }

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
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            });
                        }
                    }
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?,
                    ),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
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
        assert_eq!(parsed.pomodoro.work_min, 25);
        assert_eq!(parsed.focus.default_secs, 60);
        assert_eq!(parsed.poll.stopwatch_ms, 10);
    }

    #[test]
    fn empty_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.pomodoro.short_break_min, 5);
        assert_eq!(parsed.poll.countdown_ms, 1000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("pomodoro.work_min").as_deref(), Some("25"));
        assert_eq!(cfg.get("focus.default_secs").as_deref(), Some("60"));
        assert!(cfg.get("pomodoro.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("pomodoro.work_min", "50").unwrap();
        assert_eq!(cfg.pomodoro.work_min, 50);
    }

    #[test]
    fn set_accepts_negative_durations() {
        // Stored as-is, clamped at the point of use.
        let mut cfg = Config::default();
        cfg.set("focus.default_secs", "-30").unwrap();
        assert_eq!(cfg.focus.default_secs, -30);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("pomodoro.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_non_numeric_duration() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("pomodoro.work_min", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn negative_phase_length_clamps_to_zero() {
        let cfg = PomodoroConfig {
            work_min: -10,
            short_break_min: 5,
            long_break_min: 15,
        };
        assert_eq!(cfg.duration_ms(PomodoroPhase::Work), 0);
        assert_eq!(cfg.duration_ms(PomodoroPhase::ShortBreak), 5 * 60 * 1000);
    }

    #[test]
    fn save_and_load_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.pomodoro.long_break_min = 20;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.pomodoro.long_break_min, 20);
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "pomodoro = \"not a table\"").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
