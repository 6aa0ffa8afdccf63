// ── Entry store ──
//
// Owns the canonical-key -> entry mapping. Exactly one execution context
// holds an `EntryStore` at a time (`&mut self` on every mutation); readers
// elsewhere go through the shared feed.

use std::sync::Arc;

use super::Snapshot;
use super::collection::{EntryCollection, EntryFeed};
use crate::config::TrackerConfig;
use crate::staleness::StalenessPolicy;
use crate::stream::EntryStream;

pub struct EntryStore {
    pub(crate) entries: EntryCollection,
    pub(crate) policy: StalenessPolicy,
}

impl EntryStore {
    pub fn new(config: &TrackerConfig) -> Self {
        Self::with_feed(config, Arc::new(EntryFeed::new()))
    }

    pub(crate) fn with_feed(config: &TrackerConfig, feed: Arc<EntryFeed>) -> Self {
        Self {
            entries: EntryCollection::new(feed),
            policy: StalenessPolicy::from(config),
        }
    }

    /// The last published snapshot. Never reflects a partially applied cycle.
    pub fn snapshot(&self) -> Snapshot {
        self.entries.feed().load()
    }

    pub fn subscribe(&self) -> EntryStream {
        EntryStream::new(Arc::clone(self.entries.feed()))
    }

    pub fn policy(&self) -> StalenessPolicy {
        self.policy
    }

    /// Number of live entries, including any not yet published.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of snapshots published so far.
    pub fn version(&self) -> u64 {
        self.entries.feed().version()
    }
}
