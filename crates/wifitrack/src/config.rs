//! CLI configuration -- thin wrapper around `wifitrack_config`.
//!
//! Adds `--config` path resolution and per-invocation overrides on top of
//! the shared loader.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use wifitrack_config::{ConfigError, Defaults};
use wifitrack_core::TrackerConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub use wifitrack_config::{Config, load_config_from, save_config_to};

/// How this invocation renders its results.
#[derive(Debug, Clone)]
pub struct OutputPrefs {
    pub format: OutputFormat,
    pub color: bool,
}

/// The config file this invocation reads and writes.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(wifitrack_config::config_path)
}

/// Load the effective config (defaults -> file -> environment).
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&active_config_path(global))?)
}

/// Build the engine config from file values plus command-line overrides.
pub fn resolve_tracker_config(
    global: &GlobalOpts,
    max_entry_age: Option<Duration>,
    scan_interval: Option<Duration>,
) -> Result<TrackerConfig, CliError> {
    let mut tracker = load(global)?.tracker_config()?;
    if let Some(age) = max_entry_age {
        tracker.max_entry_age = age;
    }
    if let Some(interval) = scan_interval {
        tracker.scan_interval = interval;
    }
    tracker.validate()?;
    Ok(tracker)
}

/// Output format and color: the flag (or `WIFITRACK_OUTPUT`) wins, then the
/// config file's `[defaults]` table.
pub fn output_prefs(global: &GlobalOpts) -> Result<OutputPrefs, CliError> {
    let defaults = if global.output.is_some() && global.color.is_some() {
        Defaults::default()
    } else {
        load(global)?.defaults
    };
    output_prefs_with(global, &defaults)
}

fn output_prefs_with(global: &GlobalOpts, defaults: &Defaults) -> Result<OutputPrefs, CliError> {
    let format = match &global.output {
        Some(format) => format.clone(),
        None => parse_default("defaults.output", &defaults.output)?,
    };
    let mode = match &global.color {
        Some(mode) => mode.clone(),
        None => parse_default::<ColorMode>("defaults.color", &defaults.color)?,
    };
    Ok(OutputPrefs {
        format,
        color: output::should_color(&mode),
    })
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    <T as ValueEnum>::from_str(raw.trim(), true).map_err(|reason| {
        ConfigError::Validation {
            field: field.into(),
            reason,
        }
        .into()
    })
}
