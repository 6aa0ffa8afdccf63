//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wifitrack_config::ConfigError;
use wifitrack_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Replay scripts ───────────────────────────────────────────────
    #[error("Replay script not found: {path}")]
    #[diagnostic(
        code(wifitrack::script_not_found),
        help("Pass the path to a .json, .yaml or .yml replay script.")
    )]
    ScriptNotFound { path: String },

    #[error("Invalid replay script {path}: {reason}")]
    #[diagnostic(
        code(wifitrack::invalid_script),
        help(
            "A replay script is an object with a `steps` list. Each step has\n\
             `at_millis` and optionally `radio_state`, `scan` or `source_error`."
        )
    )]
    InvalidScript { path: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wifitrack::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(wifitrack::config_exists),
        help("Use `wifitrack config init --force` to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(wifitrack::config),
        help("Check the config file (`wifitrack config path`) and WIFITRACK_* variables.")
    )]
    Config(Box<ConfigError>),

    // ── Tracker ──────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(wifitrack::tracker))]
    Tracker(CoreError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(wifitrack::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to render config: {0}")]
    #[diagnostic(code(wifitrack::toml))]
    Toml(#[from] toml::ser::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => CliError::Validation {
                field: "tracker".into(),
                reason: message,
            },
            other => CliError::Tracker(other),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScriptNotFound { .. } => exit_code::NOT_FOUND,
            Self::InvalidScript { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } | Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let missing = CliError::ScriptNotFound { path: "x".into() };
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let bad = CliError::InvalidScript {
            path: "x".into(),
            reason: "y".into(),
        };
        assert_eq!(bad.exit_code(), exit_code::USAGE);

        let cfg: CliError = ConfigError::Validation {
            field: "tracker.scan_interval".into(),
            reason: "nope".into(),
        }
        .into();
        assert_eq!(cfg.exit_code(), exit_code::CONFIG);

        let stopped: CliError = CoreError::TrackerStopped.into();
        assert_eq!(stopped.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn core_config_errors_become_usage_errors() {
        let err: CliError = CoreError::Config {
            message: "scan_interval must be greater than zero".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("scan_interval"));
    }
}
