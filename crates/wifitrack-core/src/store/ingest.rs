// ── Ingestion cycle application ──
//
// One scan cycle: decode -> aggregate -> upsert -> evict -> publish.
// Upserts never move an entry's timestamp backwards, and eviction runs
// against the cycle's own `now`, never the wall clock.

use std::time::Duration;

use serde::Serialize;

use super::EntryStore;
use crate::aggregate::aggregate;
use crate::decode::decode_all;
use crate::model::{NativeScanRecord, RawScanRecord, WifiEntry};
use crate::staleness::is_expired;

/// One pass of scan records through the pipeline. Consumed by
/// [`EntryStore::ingest`].
#[derive(Debug, Clone)]
pub struct IngestionCycle {
    pub records: Vec<RawScanRecord>,
    /// `false` when the radio reported that the scan behind these records
    /// failed; the records are then whatever the radio still had cached.
    pub succeeded: bool,
    pub observed_at_millis: i64,
}

impl IngestionCycle {
    /// Build a cycle from native records, dropping any without an SSID.
    pub fn from_native(
        natives: Vec<NativeScanRecord>,
        succeeded: bool,
        observed_at_millis: i64,
    ) -> Self {
        Self {
            records: decode_all(natives),
            succeeded,
            observed_at_millis,
        }
    }
}

/// What a single cycle did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub inserted: usize,
    pub updated: usize,
    /// Records older than the entry they matched; left unapplied.
    pub ignored_older: usize,
    pub evicted: usize,
    pub retained: usize,
    #[serde(with = "millis")]
    pub effective_max_age: Duration,
}

impl EntryStore {
    /// Apply one ingestion cycle and publish the resulting snapshot.
    pub fn ingest(&mut self, cycle: IngestionCycle) -> IngestReport {
        let IngestionCycle {
            records,
            succeeded,
            observed_at_millis: now,
        } = cycle;

        let max_age = self.policy.effective_max_age(succeeded);
        let mut report = IngestReport {
            effective_max_age: max_age,
            ..IngestReport::default()
        };

        for (key, record) in aggregate(records) {
            if let Some(existing) = self.entries.get(&key) {
                if record.observed_at_millis < existing.last_seen_millis {
                    report.ignored_older += 1;
                    continue;
                }
            }
            if self.entries.upsert(WifiEntry::from_record(key, record)) {
                report.inserted += 1;
            } else {
                report.updated += 1;
            }
        }

        report.evicted = self
            .entries
            .retain(|entry| !is_expired(now, entry.last_seen_millis, max_age));
        report.retained = self.entries.len();

        self.entries.publish();
        report
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::TrackerConfig;
    use crate::model::{CanonicalKey, SecurityClass};

    const START: i64 = 123_456_789;
    const MAX_AGE: Duration = Duration::from_millis(15_000);
    const INTERVAL: Duration = Duration::from_millis(10_000);

    fn store() -> EntryStore {
        EntryStore::new(&TrackerConfig::new(MAX_AGE, INTERVAL))
    }

    fn scan(ssid: &str, bssid: &str, at: i64) -> NativeScanRecord {
        NativeScanRecord::new(Some(ssid), bssid, at)
    }

    fn five_networks(at: i64) -> Vec<NativeScanRecord> {
        (0..5)
            .map(|i| scan(&format!("ssid{i}"), &format!("bssid{i}"), at))
            .collect()
    }

    fn keys(store: &EntryStore) -> Vec<String> {
        store
            .snapshot()
            .iter()
            .map(|e| e.key.to_string())
            .collect()
    }

    #[test]
    fn empty_cycle_on_empty_store_yields_empty_snapshot() {
        let mut store = store();
        let report = store.ingest(IngestionCycle::from_native(Vec::new(), true, START));
        assert!(store.snapshot().is_empty());
        assert_eq!(store.version(), 1);
        assert_eq!(report.retained, 0);
        assert_eq!(report.inserted, 0);
    }

    #[test]
    fn one_entry_per_ssid_and_security_pair() {
        let mut store = store();
        store.ingest(IngestionCycle::from_native(
            vec![
                scan("Open Network", "bssid0", START),
                scan("Open Network", "bssid1", START),
                scan("Secure Network", "bssid2", START).with_capabilities("EAP"),
                NativeScanRecord::new(None, "bssidNull", START),
                scan("", "bssidEmpty", START),
            ],
            true,
            START,
        ));

        assert_eq!(keys(&store), ["Open Network,open", "Secure Network,eap"]);
    }

    #[test]
    fn entries_live_until_max_age_then_expire() {
        let mut store = store();
        store.ingest(IngestionCycle::from_native(five_networks(START), true, START));

        store.ingest(IngestionCycle::from_native(
            five_networks(START),
            true,
            START + 15_000,
        ));
        assert_eq!(store.snapshot().len(), 5);

        let report = store.ingest(IngestionCycle::from_native(
            five_networks(START),
            true,
            START + 15_001,
        ));
        assert!(store.snapshot().is_empty());
        assert_eq!(report.evicted, 5);
    }

    #[test]
    fn failed_cycle_extends_age_by_one_interval() {
        let mut store = store();
        store.ingest(IngestionCycle::from_native(five_networks(START), true, START));
        let before = store.snapshot();

        let report = store.ingest(IngestionCycle::from_native(
            five_networks(START),
            false,
            START + 25_000,
        ));
        assert_eq!(report.effective_max_age, Duration::from_millis(25_000));
        assert_eq!(store.snapshot().as_slice(), before.as_slice());

        store.ingest(IngestionCycle::from_native(
            five_networks(START),
            true,
            START + 25_000,
        ));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn grace_does_not_compound_across_failures() {
        let mut store = store();
        store.ingest(IngestionCycle::from_native(five_networks(START), true, START));

        store.ingest(IngestionCycle::from_native(Vec::new(), false, START + 20_000));
        assert_eq!(store.snapshot().len(), 5);

        store.ingest(IngestionCycle::from_native(Vec::new(), false, START + 25_001));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn newer_records_refresh_entry() {
        let mut store = store();
        store.ingest(IngestionCycle::from_native(
            vec![scan("Home", "ap-1", START)],
            true,
            START,
        ));
        let report = store.ingest(IngestionCycle::from_native(
            vec![scan("Home", "ap-2", START + 9_000)],
            true,
            START + 10_000,
        ));

        assert_eq!(report.updated, 1);
        let snap = store.snapshot();
        let entry = snap.first().unwrap();
        assert_eq!(entry.last_seen_millis, START + 9_000);
        assert_eq!(entry.representative.bssid, "ap-2");
    }

    #[test]
    fn older_records_never_move_time_backwards() {
        let mut store = store();
        store.ingest(IngestionCycle::from_native(
            vec![scan("Home", "ap-new", START + 5_000)],
            true,
            START + 5_000,
        ));
        let report = store.ingest(IngestionCycle::from_native(
            vec![scan("Home", "ap-old", START)],
            true,
            START + 6_000,
        ));

        assert_eq!(report.ignored_older, 1);
        let snap = store.snapshot();
        let entry = snap.first().unwrap();
        assert_eq!(entry.last_seen_millis, START + 5_000);
        assert_eq!(entry.representative.bssid, "ap-new");
    }

    #[test]
    fn dropped_networks_age_out_while_others_refresh() {
        let mut store = store();
        store.ingest(IngestionCycle::from_native(
            vec![scan("stays", "a", START), scan("leaves", "b", START)],
            true,
            START,
        ));
        let report = store.ingest(IngestionCycle::from_native(
            vec![scan("stays", "a", START + 16_000)],
            true,
            START + 16_000,
        ));

        assert_eq!(report.evicted, 1);
        assert_eq!(keys(&store), ["stays,open"]);
        assert_eq!(
            store.snapshot()[0].key,
            CanonicalKey::new("stays", SecurityClass::Open)
        );
    }

    #[test]
    fn report_serializes_max_age_in_millis() {
        let report = IngestReport {
            effective_max_age: Duration::from_millis(25_000),
            ..IngestReport::default()
        };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["effective_max_age"], 25_000);
    }
}
