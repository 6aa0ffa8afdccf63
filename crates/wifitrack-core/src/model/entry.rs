// ── Logical entry types ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::scan::RawScanRecord;
use super::security::SecurityClass;

/// Deduplication key: every access point broadcasting the same SSID with
/// the same security class surfaces as one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalKey {
    pub ssid: String,
    pub security: SecurityClass,
}

impl CanonicalKey {
    pub fn new(ssid: impl Into<String>, security: SecurityClass) -> Self {
        Self {
            ssid: ssid.into(),
            security,
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.ssid, self.security)
    }
}

/// The externally visible, deduplicated view of one network.
///
/// `last_seen_millis` always equals `representative.observed_at_millis`:
/// the representative is the freshest record seen for this key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiEntry {
    pub key: CanonicalKey,
    pub last_seen_millis: i64,
    pub representative: RawScanRecord,
}

impl WifiEntry {
    pub(crate) fn from_record(key: CanonicalKey, record: RawScanRecord) -> Self {
        Self {
            key,
            last_seen_millis: record.observed_at_millis,
            representative: record,
        }
    }

    pub fn ssid(&self) -> &str {
        &self.key.ssid
    }

    pub fn security(&self) -> SecurityClass {
        self.key.security
    }

    /// Milliseconds since this entry was last observed, clamped at zero for
    /// observations stamped after `now_millis`.
    pub fn age_millis(&self, now_millis: i64) -> u64 {
        u64::try_from(now_millis.saturating_sub(self.last_seen_millis)).unwrap_or(0)
    }
}
