//! TOML-based application configuration.
//!
//! Holds:
//! - Countdown length and tick timing
//! - The congratulatory message list
//!
//! Configuration is read from `<config dir>/pushup-plus/config.toml` and is
//! never written back. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::countdown::TimerConfig;
use crate::error::ConfigError;
use crate::messages::CongratulatoryMessages;
use crate::recording::DEFAULT_COUNTDOWN_SECONDS;

/// Countdown-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_countdown_seconds")]
    pub seconds: i64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_tick_tolerance_ms")]
    pub tick_tolerance_ms: u64,
}

/// Message configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default)]
    pub congratulatory: CongratulatoryMessages,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

fn default_countdown_seconds() -> i64 {
    DEFAULT_COUNTDOWN_SECONDS
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_tick_tolerance_ms() -> u64 {
    100
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            seconds: default_countdown_seconds(),
            tick_interval_ms: default_tick_interval_ms(),
            tick_tolerance_ms: default_tick_tolerance_ms(),
        }
    }
}

impl Config {
    /// `<config dir>/pushup-plus/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pushup-plus")
            .join("config.toml")
    }

    /// Load from the default location.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load from `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// TOML, or holds out-of-range values.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                })
            }
        };
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] or [`ConfigError::InvalidValue`].
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.countdown;
        if c.seconds <= 0 {
            return Err(invalid("countdown.seconds", "must be greater than zero"));
        }
        if c.tick_interval_ms == 0 {
            return Err(invalid("countdown.tick_interval_ms", "must be greater than zero"));
        }
        if c.tick_tolerance_ms > c.tick_interval_ms {
            return Err(invalid(
                "countdown.tick_tolerance_ms",
                "must not exceed countdown.tick_interval_ms",
            ));
        }
        Ok(())
    }

    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            tick_interval: Duration::from_millis(self.countdown.tick_interval_ms),
            tick_tolerance: Duration::from_millis(self.countdown.tick_tolerance_ms),
        }
    }

    pub fn messages(&self) -> &CongratulatoryMessages {
        &self.messages.congratulatory
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.countdown.seconds, 3);
        assert_eq!(parsed.messages().len(), 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = Config::from_toml("[countdown]\nseconds = 10\n").unwrap();
        assert_eq!(cfg.countdown.seconds, 10);
        assert_eq!(cfg.countdown.tick_interval_ms, 1000);
        assert_eq!(cfg.messages(), &CongratulatoryMessages::default());
    }

    #[test]
    fn rejects_non_positive_countdown() {
        let err = Config::from_toml("[countdown]\nseconds = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "countdown.seconds"));
    }

    #[test]
    fn rejects_tolerance_above_interval() {
        let err = Config::from_toml("[countdown]\ntick_interval_ms = 100\ntick_tolerance_ms = 500\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_empty_message_list() {
        let err = Config::from_toml("[messages]\ncongratulatory = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Config::from_toml("[countdown\n"),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.countdown.seconds, 3);
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[countdown]\nseconds = 5\n\n[messages]\ncongratulatory = [\"Nice!\"]\n",
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.countdown.seconds, 5);
        assert_eq!(cfg.messages().as_slice(), &["Nice!".to_string()]);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("countdown.seconds").as_deref(), Some("3"));
        assert_eq!(cfg.get("countdown.tick_tolerance_ms").as_deref(), Some("100"));
        assert!(cfg.get("countdown.nope").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn timer_config_converts_milliseconds() {
        let cfg = Config::default();
        let timer = cfg.timer_config();
        assert_eq!(timer.tick_interval, Duration::from_secs(1));
        assert_eq!(timer.tick_tolerance, Duration::from_millis(100));
    }
}
