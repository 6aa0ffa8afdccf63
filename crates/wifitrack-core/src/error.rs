// ── Core error types ──
//
// Scan-data anomalies (missing SSIDs, unknown capabilities, failed scans,
// an unreachable scan source) are absorbed by the engine and never show up
// here. These errors only describe misuse of the tracker itself.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Wifi tracker is not running")]
    TrackerStopped,

    #[error("Signal queue is full ({capacity} signals pending)")]
    SignalQueueFull { capacity: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },
}
