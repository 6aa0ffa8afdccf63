//! Scan-result aggregation engine for wireless network pickers.
//!
//! Turns the radio's noisy, per-access-point scan lists into a stable,
//! deduplicated list of networks:
//!
//! - **[`WifiTracker`]** - Central facade. [`start()`](WifiTracker::start)
//!   spawns a worker task that owns the entry store and applies platform
//!   [`Signal`]s one at a time, plus a notifier task that delivers
//!   [`TrackerCallback`] calls off the caller's context.
//!
//! - **[`EntryStore`]** - Canonical-key -> entry mapping with single-writer
//!   mutation and lock-free snapshot reads (`ArcSwap` + `tokio::sync::watch`).
//!   Each [`IngestionCycle`] is decoded, aggregated, upserted and evicted
//!   before one immutable snapshot is published.
//!
//! - **[`StalenessPolicy`]** - Age threshold for eviction, widened by one
//!   scan interval for a cycle whose scan failed.
//!
//! - **[`EntryStream`]** - Subscription handle exposing `current()` /
//!   `latest()` / `changed()` and a `Stream` adapter.
//!
//! - **Domain model** ([`model`]) - [`NativeScanRecord`] as handed over by
//!   the platform, [`RawScanRecord`] once decoded, [`WifiEntry`] keyed by
//!   [`CanonicalKey`] (`ssid` + [`SecurityClass`]).

pub mod aggregate;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod source;
pub mod staleness;
pub mod store;
pub mod stream;
pub mod tracker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::TrackerConfig;
pub use error::CoreError;
pub use source::{Clock, ManualClock, MemorySource, RadioSource, SourceError, SystemClock};
pub use staleness::StalenessPolicy;
pub use store::{EntryStore, IngestReport, IngestionCycle, Snapshot};
pub use stream::{EntryFilter, EntryStream};
pub use tracker::{
    NoopCallback, Signal, SignalOutcome, SignalSender, TrackerCallback, TrackerEvent, WifiTracker,
};

pub use model::{
    CanonicalKey, NativeScanRecord, RadioState, RawScanRecord, SecurityClass, WifiEntry,
};
