// ── Runtime tracker configuration ──
//
// Fixed for the lifetime of a tracker. The CLI (or any embedder) builds a
// `TrackerConfig` and hands it in; core never reads config files.

use std::time::Duration;

use crate::error::CoreError;

pub const DEFAULT_MAX_ENTRY_AGE: Duration = Duration::from_secs(15);
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// How long an entry may go unobserved before it is evicted.
    pub max_entry_age: Duration,
    /// Expected cadence of scan cycles. Also the grace extension applied
    /// after a failed cycle.
    pub scan_interval: Duration,
    /// Ask the radio source for a scan every `scan_interval` while the
    /// radio is enabled.
    pub active_scanning: bool,
}

impl TrackerConfig {
    pub fn new(max_entry_age: Duration, scan_interval: Duration) -> Self {
        Self {
            max_entry_age,
            scan_interval,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_entry_age.is_zero() {
            return Err(CoreError::Config {
                message: "max_entry_age must be greater than zero".into(),
            });
        }
        if self.scan_interval.is_zero() {
            return Err(CoreError::Config {
                message: "scan_interval must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_entry_age: DEFAULT_MAX_ENTRY_AGE,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            active_scanning: true,
        }
    }
}
