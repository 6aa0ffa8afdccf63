// ── Scan record types ──
//
// `NativeScanRecord` is what a radio source hands over; `RawScanRecord` is
// the validated form that survives decoding. Neither outlives one
// aggregation pass.

use serde::{Deserialize, Serialize};

use super::entry::CanonicalKey;
use super::security::SecurityClass;

/// One observation of a nearby network, as reported by the radio source.
///
/// The identifier may be missing or empty (hidden networks, driver noise);
/// such records are dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeScanRecord {
    #[serde(default)]
    pub ssid: Option<String>,
    pub bssid: String,
    #[serde(default)]
    pub capabilities: String,
    pub timestamp_millis: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi_dbm: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<u32>,
}

impl NativeScanRecord {
    pub fn new(ssid: Option<&str>, bssid: impl Into<String>, timestamp_millis: i64) -> Self {
        Self {
            ssid: ssid.map(str::to_owned),
            bssid: bssid.into(),
            capabilities: String::new(),
            timestamp_millis,
            rssi_dbm: None,
            frequency_mhz: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: impl Into<String>) -> Self {
        self.capabilities = capabilities.into();
        self
    }

    pub fn with_signal(mut self, rssi_dbm: i32, frequency_mhz: u32) -> Self {
        self.rssi_dbm = Some(rssi_dbm);
        self.frequency_mhz = Some(frequency_mhz);
        self
    }
}

/// A decoded scan observation with a guaranteed non-empty SSID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScanRecord {
    pub ssid: String,
    pub bssid: String,
    pub capabilities: String,
    pub security: SecurityClass,
    pub observed_at_millis: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi_dbm: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<u32>,
}

impl RawScanRecord {
    /// The deduplication key: SSID plus derived security class.
    pub fn key(&self) -> CanonicalKey {
        CanonicalKey::new(self.ssid.clone(), self.security)
    }
}
