// ── Scan record decoding ──
//
// Normalizes native scan observations into `RawScanRecord`s. Records
// without a usable SSID are expected noise and are filtered, not reported.

use tracing::trace;

use crate::model::{NativeScanRecord, RawScanRecord, SecurityClass};

/// Decode a single native record. Returns `None` when the SSID is absent
/// or empty.
pub fn decode(native: NativeScanRecord) -> Option<RawScanRecord> {
    let NativeScanRecord {
        ssid,
        bssid,
        capabilities,
        timestamp_millis,
        rssi_dbm,
        frequency_mhz,
    } = native;

    let Some(ssid) = ssid.filter(|s| !s.is_empty()) else {
        trace!(%bssid, "dropping scan record without ssid");
        return None;
    };

    let security = SecurityClass::from_capabilities(&capabilities);
    Some(RawScanRecord {
        ssid,
        bssid,
        capabilities,
        security,
        observed_at_millis: timestamp_millis,
        rssi_dbm,
        frequency_mhz,
    })
}

/// Decode a whole scan list, preserving input order of the valid records.
pub fn decode_all(natives: impl IntoIterator<Item = NativeScanRecord>) -> Vec<RawScanRecord> {
    natives.into_iter().filter_map(decode).collect()
}
