//! Configuration for the wifitrack CLI.
//!
//! TOML file at the platform config dir, overlaid by `WIFITRACK_*`
//! environment variables, and translation to
//! `wifitrack_core::TrackerConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wifitrack_core::TrackerConfig;
use wifitrack_core::config::{DEFAULT_MAX_ENTRY_AGE, DEFAULT_SCAN_INTERVAL};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global output defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Engine settings.
    #[serde(default)]
    pub tracker: TrackerSection,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// `[tracker]` table. Durations are human strings such as `"15s"` or
/// `"1m 30s"`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TrackerSection {
    #[serde(default = "default_max_entry_age")]
    pub max_entry_age: String,

    #[serde(default = "default_scan_interval")]
    pub scan_interval: String,

    #[serde(default = "default_active_scanning")]
    pub active_scanning: bool,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            max_entry_age: default_max_entry_age(),
            scan_interval: default_scan_interval(),
            active_scanning: default_active_scanning(),
        }
    }
}

fn default_max_entry_age() -> String {
    humantime::format_duration(DEFAULT_MAX_ENTRY_AGE).to_string()
}
fn default_scan_interval() -> String {
    humantime::format_duration(DEFAULT_SCAN_INTERVAL).to_string()
}
fn default_active_scanning() -> bool {
    true
}

impl Config {
    /// Parse and validate the `[tracker]` table into an engine config.
    pub fn tracker_config(&self) -> Result<TrackerConfig, ConfigError> {
        let config = TrackerConfig {
            max_entry_age: parse_duration("tracker.max_entry_age", &self.tracker.max_entry_age)?,
            scan_interval: parse_duration("tracker.scan_interval", &self.tracker.scan_interval)?,
            active_scanning: self.tracker.active_scanning,
        };
        config.validate().map_err(|e| ConfigError::Validation {
            field: "tracker".into(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }
}

fn parse_duration(field: &str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw.trim()).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a duration ({e})"),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wifitrack", "wifitrack").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wifitrack");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from a config file + `WIFITRACK_*` environment. A missing file yields the
/// defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WIFITRACK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to pretty TOML, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_translate_to_engine_defaults() {
        let tracker = Config::default().tracker_config().unwrap();
        assert_eq!(tracker, TrackerConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.tracker.max_entry_age, "15s");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\noutput = \"json\"\n\n[tracker]\nmax_entry_age = \"1m 30s\"\nactive_scanning = false\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");

        let tracker = cfg.tracker_config().unwrap();
        assert_eq!(tracker.max_entry_age, Duration::from_secs(90));
        assert_eq!(tracker.scan_interval, DEFAULT_SCAN_INTERVAL);
        assert!(!tracker.active_scanning);
    }

    #[test]
    fn bad_durations_are_validation_errors() {
        let mut cfg = Config::default();
        cfg.tracker.scan_interval = "soon".into();
        let err = cfg.tracker_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "tracker.scan_interval"));

        cfg.tracker.scan_interval = "0s".into();
        assert!(matches!(
            cfg.tracker_config(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.tracker.scan_interval = "5s".into();
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.tracker.scan_interval, "5s");
    }
}
