// ── Entry collection ──
//
// Single-owner keyed storage for logical entries, plus the shared feed that
// readers consume. Mutations touch only the private map; nothing becomes
// visible until `publish()` swaps in a fresh immutable snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use tokio::sync::watch;

use super::Snapshot;
use crate::model::{CanonicalKey, WifiEntry};

/// The read side of the store, shared between the owner and any number of
/// readers on other threads.
///
/// `snapshot` is swapped atomically, so reads never block the owner and
/// never observe a half-applied cycle. `version` is bumped after each swap
/// for push-based change notification.
pub(crate) struct EntryFeed {
    snapshot: ArcSwap<Vec<Arc<WifiEntry>>>,
    version: watch::Sender<u64>,
}

impl EntryFeed {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            snapshot: ArcSwap::from_pointee(Vec::new()),
            version,
        }
    }

    /// Current snapshot (cheap `Arc` clone, lock-free).
    pub(crate) fn load(&self) -> Snapshot {
        self.snapshot.load_full()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn publish(&self, values: Vec<Arc<WifiEntry>>) {
        self.snapshot.store(Arc::new(values));
        // `send_modify` updates unconditionally, even with zero receivers.
        self.version.send_modify(|v| *v += 1);
    }
}

/// Entries keyed by canonical key, in first-insertion order.
pub(crate) struct EntryCollection {
    by_key: IndexMap<CanonicalKey, Arc<WifiEntry>>,
    feed: Arc<EntryFeed>,
}

impl EntryCollection {
    pub(crate) fn new(feed: Arc<EntryFeed>) -> Self {
        Self {
            by_key: IndexMap::new(),
            feed,
        }
    }

    /// Insert or replace an entry. Returns `true` if the key was new.
    /// Existing keys keep their position.
    pub(crate) fn upsert(&mut self, entry: WifiEntry) -> bool {
        self.by_key
            .insert(entry.key.clone(), Arc::new(entry))
            .is_none()
    }

    pub(crate) fn get(&self, key: &CanonicalKey) -> Option<&Arc<WifiEntry>> {
        self.by_key.get(key)
    }

    /// Drop every entry for which `keep` returns `false`, preserving the
    /// order of survivors. Returns the number removed.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&WifiEntry) -> bool) -> usize {
        let before = self.by_key.len();
        self.by_key.retain(|_, entry| keep(entry));
        before - self.by_key.len()
    }

    /// Rebuild the snapshot from the current map and hand it to readers.
    pub(crate) fn publish(&self) {
        let values: Vec<Arc<WifiEntry>> = self.by_key.values().cloned().collect();
        self.feed.publish(values);
    }

    pub(crate) fn feed(&self) -> &Arc<EntryFeed> {
        &self.feed
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{RawScanRecord, SecurityClass};

    fn entry(ssid: &str, seen: i64) -> WifiEntry {
        let record = RawScanRecord {
            ssid: ssid.into(),
            bssid: format!("{ssid}-bssid"),
            capabilities: String::new(),
            security: SecurityClass::Open,
            observed_at_millis: seen,
            rssi_dbm: None,
            frequency_mhz: None,
        };
        WifiEntry::from_record(record.key(), record)
    }

    fn collection() -> EntryCollection {
        EntryCollection::new(Arc::new(EntryFeed::new()))
    }

    #[test]
    fn upsert_reports_new_keys() {
        let mut col = collection();
        assert!(col.upsert(entry("a", 1)));
        assert!(!col.upsert(entry("a", 2)));
        assert_eq!(col.len(), 1);
        assert_eq!(
            col.get(&CanonicalKey::new("a", SecurityClass::Open))
                .unwrap()
                .last_seen_millis,
            2
        );
    }

    #[test]
    fn mutations_are_invisible_until_published() {
        let mut col = collection();
        col.upsert(entry("a", 1));
        assert!(col.feed().load().is_empty());
        assert_eq!(col.feed().version(), 0);

        col.publish();
        assert_eq!(col.feed().load().len(), 1);
        assert_eq!(col.feed().version(), 1);
    }

    #[test]
    fn published_snapshot_is_not_mutated_afterwards() {
        let mut col = collection();
        col.upsert(entry("a", 1));
        col.publish();
        let handed_out = col.feed().load();

        col.upsert(entry("b", 1));
        col.retain(|_| false);
        col.publish();

        assert_eq!(handed_out.len(), 1);
        assert!(col.feed().load().is_empty());
    }

    #[test]
    fn retain_preserves_survivor_order() {
        let mut col = collection();
        for (ssid, seen) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            col.upsert(entry(ssid, seen));
        }
        let removed = col.retain(|e| e.last_seen_millis % 2 == 0);
        assert_eq!(removed, 2);
        col.publish();

        let ssids: Vec<_> = col
            .feed()
            .load()
            .iter()
            .map(|e| e.ssid().to_owned())
            .collect();
        assert_eq!(ssids, ["b", "d"]);
        assert!(!col.is_empty());
    }
}
