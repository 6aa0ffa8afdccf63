//! Clap derive structures for the `wifitrack` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use strum::IntoEnumIterator;

use wifitrack_core::SecurityClass;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wifitrack -- replay and inspect wireless scan aggregation
#[derive(Debug, Parser)]
#[command(
    name = "wifitrack",
    version,
    about = "Turn noisy WiFi scan results into a stable list of networks",
    long_about = "Aggregates per-access-point scan results into one entry per \
        (SSID, security) pair,\nages out networks that stop appearing, and \
        tolerates a single failed scan.\n\n\
        Scan sequences are fed in as replay scripts (JSON or YAML).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format [default: `defaults.output` from the config, else table]
    #[arg(long, short = 'o', env = "WIFITRACK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: `defaults.color` from the config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Config file to use instead of the platform default
    #[arg(long, env = "WIFITRACK_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Feed a scripted scan sequence through the tracker and print the entries
    #[command(alias = "r")]
    Replay(ReplayArgs),

    /// Classify capability strings into security classes
    #[command(alias = "c")]
    Classify(ClassifyArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Write roff man pages for every command
    #[command(hide = true)]
    Man(ManArgs),
}

// ── Replay ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Replay script (.json, .yaml or .yml)
    pub script: PathBuf,

    /// Print the entry list after every step, not just the last
    #[arg(long)]
    pub each: bool,

    /// Override the configured max entry age (e.g. "15s")
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub max_entry_age: Option<Duration>,

    /// Override the configured scan interval (e.g. "10s")
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub scan_interval: Option<Duration>,

    /// Only show entries of this security class (e.g. "psk", "eap-suite-b")
    #[arg(long, value_parser = parse_security, value_name = "CLASS")]
    pub security: Option<SecurityClass>,

    /// Only show entries whose SSID contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub ssid: Option<String>,

    /// Only show networks that need a credential to join
    #[arg(long)]
    pub secured: bool,

    /// Only show entries seen within this long of the step time (e.g. "5s")
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub seen_within: Option<Duration>,
}

fn parse_security(raw: &str) -> Result<SecurityClass, String> {
    raw.parse::<SecurityClass>().map_err(|_| {
        let known: Vec<String> = SecurityClass::iter().map(|c| c.to_string()).collect();
        format!("unknown security class '{raw}' (expected one of: {})", known.join(", "))
    })
}

// ── Classify ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Capability strings, e.g. "[WPA2-PSK-CCMP][ESS]"
    #[arg(required = true)]
    pub capabilities: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Man pages ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ManArgs {
    /// Directory to write `wifitrack.1` and `wifitrack-<command>.1` into
    #[arg(value_name = "DIR")]
    pub out_dir: PathBuf,
}
