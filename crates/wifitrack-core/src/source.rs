// ── External collaborators ──
//
// The radio source and the clock are supplied by the embedder. All calls
// are synchronous and assumed bounded; latency and retries are the
// source's concern, not the tracker's.

use std::io;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::model::{NativeScanRecord, RadioState};

/// Failure to obtain data from the radio source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("scan source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("scan source I/O error: {0}")]
    Io(#[from] io::Error),
}

/// The platform's wireless radio, as seen by the tracker.
pub trait RadioSource: Send + Sync + 'static {
    /// The radio's current scan list.
    fn scan_results(&self) -> Result<Vec<NativeScanRecord>, SourceError>;

    /// The radio's current power state.
    fn radio_state(&self) -> RadioState;

    /// Ask the radio to start a new scan. Results arrive later through a
    /// scan-results signal. Passive sources can keep the no-op default.
    fn request_scan(&self) -> Result<(), SourceError> {
        Ok(())
    }
}

/// Millisecond time source used for every age computation.
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Used for replays and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let step = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now.fetch_add(step, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// An in-memory radio source whose answers are set from outside.
///
/// Drives replays from the CLI and stands in for the platform in tests.
#[derive(Debug)]
pub struct MemorySource {
    scan: Mutex<Result<Vec<NativeScanRecord>, String>>,
    state: Mutex<RadioState>,
    scans_requested: AtomicU64,
}

impl MemorySource {
    pub fn new(state: RadioState) -> Self {
        Self {
            scan: Mutex::new(Ok(Vec::new())),
            state: Mutex::new(state),
            scans_requested: AtomicU64::new(0),
        }
    }

    pub fn set_scan_results(&self, records: Vec<NativeScanRecord>) {
        *self.scan.lock().unwrap_or_else(PoisonError::into_inner) = Ok(records);
    }

    /// Make subsequent `scan_results` calls fail until results are set again.
    pub fn fail_scan_results(&self, reason: impl Into<String>) {
        *self.scan.lock().unwrap_or_else(PoisonError::into_inner) = Err(reason.into());
    }

    pub fn set_radio_state(&self, state: RadioState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn scans_requested(&self) -> u64 {
        self.scans_requested.load(Ordering::SeqCst)
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(RadioState::Unknown)
    }
}

impl RadioSource for MemorySource {
    fn scan_results(&self) -> Result<Vec<NativeScanRecord>, SourceError> {
        self.scan
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .map_err(|reason| SourceError::Unavailable { reason })
    }

    fn radio_state(&self) -> RadioState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request_scan(&self) -> Result<(), SourceError> {
        self.scans_requested.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
