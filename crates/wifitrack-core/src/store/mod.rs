// ── Entry store ──
//
// Single-writer entry storage with lock-free snapshot reads.

mod collection;
mod entry_store;
mod ingest;

use std::sync::Arc;

use crate::model::WifiEntry;

pub(crate) use collection::EntryFeed;
pub use entry_store::EntryStore;
pub use ingest::{IngestReport, IngestionCycle};

/// An immutable, shareable view of every live entry.
pub type Snapshot = Arc<Vec<Arc<WifiEntry>>>;
