// ── Scan record aggregation ──
//
// Groups one cycle's valid records by canonical key, keeping the freshest
// record per key. Pure: no store access.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::model::{CanonicalKey, RawScanRecord};

/// Collapse records sharing `(ssid, security)` into one representative.
///
/// The record with the latest `observed_at_millis` wins; on a tie the one
/// seen first in the input is kept. Output iterates in first-seen key order.
pub fn aggregate(records: Vec<RawScanRecord>) -> IndexMap<CanonicalKey, RawScanRecord> {
    let mut by_key: IndexMap<CanonicalKey, RawScanRecord> = IndexMap::with_capacity(records.len());

    for record in records {
        match by_key.entry(record.key()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if record.observed_at_millis > slot.get().observed_at_millis {
                    slot.insert(record);
                }
            }
        }
    }

    by_key
}
