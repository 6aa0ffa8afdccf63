// ── Wifi tracker ──
//
// Lifecycle management for the entry engine. Signals from the platform are
// marshalled onto a single worker task that owns the `EntryStore`; observer
// callbacks are delivered from a separate notifier task, never from inside
// the caller's own signal delivery.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::error::CoreError;
use crate::model::RadioState;
use crate::source::{Clock, RadioSource};
use crate::store::{EntryFeed, EntryStore, IngestReport, IngestionCycle, Snapshot};
use crate::stream::EntryStream;

const SIGNAL_CHANNEL_SIZE: usize = 64;
const EVENT_CHANNEL_SIZE: usize = 256;

// ── Signals and events ───────────────────────────────────────────

/// A notification from the platform that something about the radio changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The radio's power state changed. Carries no payload; the tracker
    /// re-reads the state from the source.
    RadioStateChanged,
    /// A scan finished. `updated` is `false` when the platform reports that
    /// the scan failed and the results are stale.
    ScanResultsAvailable { updated: bool },
}

impl Signal {
    /// A successful scan-results signal.
    pub fn scan_results() -> Self {
        Self::ScanResultsAvailable { updated: true }
    }
}

/// What the worker did with a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Ingested(IngestReport),
    /// The source could not produce a scan list; the store was left alone.
    ScanSourceUnavailable,
    RadioState { state: RadioState, changed: bool },
}

/// Broadcast to async observers after the matching callback has run.
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    EntriesChanged(Snapshot),
    StateChanged(RadioState),
}

/// Observer interface. Called from the tracker's notifier task, one call
/// at a time, in the order the worker produced them.
pub trait TrackerCallback: Send + Sync + 'static {
    fn on_wifi_entries_changed(&self) {}
    fn on_wifi_state_changed(&self) {}
}

/// Callback that ignores everything. For consumers that only use
/// [`WifiTracker::events`] or [`WifiTracker::subscribe_entries`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl TrackerCallback for NoopCallback {}

struct SignalEnvelope {
    signal: Signal,
    response_tx: Option<oneshot::Sender<SignalOutcome>>,
}

// ── WifiTracker ──────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<TrackerInner>`. Starts stopped; call
/// [`start()`](Self::start) to spawn the background tasks.
#[derive(Clone)]
pub struct WifiTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    config: TrackerConfig,
    source: Arc<dyn RadioSource>,
    clock: Arc<dyn Clock>,
    callback: Arc<dyn TrackerCallback>,
    feed: Arc<EntryFeed>,
    radio_state: watch::Sender<RadioState>,
    event_tx: broadcast::Sender<TrackerEvent>,
    // `None` while stopped.
    signal_tx: ArcSwapOption<mpsc::Sender<SignalEnvelope>>,
    lifecycle: Mutex<Lifecycle>,
}

struct Lifecycle {
    // The store lives here between runs and inside the worker during one.
    parked: Option<EntryStore>,
    running: Option<RunningTasks>,
}

struct RunningTasks {
    cancel: CancellationToken,
    worker: JoinHandle<EntryStore>,
    helpers: Vec<JoinHandle<()>>,
}

impl WifiTracker {
    pub fn new(
        config: TrackerConfig,
        source: Arc<dyn RadioSource>,
        clock: Arc<dyn Clock>,
        callback: Arc<dyn TrackerCallback>,
    ) -> Self {
        let feed = Arc::new(EntryFeed::new());
        let store = EntryStore::with_feed(&config, Arc::clone(&feed));
        let (radio_state, _) = watch::channel(RadioState::Unknown);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Self {
            inner: Arc::new(TrackerInner {
                config,
                source,
                clock,
                callback,
                feed,
                radio_state,
                event_tx,
                signal_tx: ArcSwapOption::empty(),
                lifecycle: Mutex::new(Lifecycle {
                    parked: Some(store),
                    running: None,
                }),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the worker, notifier and (optionally) scan-trigger tasks, then
    /// read the radio state so [`wifi_state()`](Self::wifi_state) reflects
    /// the source before this returns. Starting twice is a no-op.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.inner.config.validate()?;

        {
            let mut lifecycle = self.inner.lifecycle.lock().await;
            if lifecycle.running.is_some() {
                return Ok(());
            }

            let store = lifecycle.parked.take().unwrap_or_else(|| self.fresh_store());
            let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_CHANNEL_SIZE);
            let (notify_tx, notify_rx) = mpsc::unbounded_channel();
            let cancel = CancellationToken::new();

            let worker = tokio::spawn(worker_task(
                Arc::clone(&self.inner),
                store,
                signal_rx,
                notify_tx,
                cancel.clone(),
            ));

            let mut helpers = vec![tokio::spawn(notifier_task(
                Arc::clone(&self.inner),
                notify_rx,
            ))];
            if self.inner.config.active_scanning {
                helpers.push(tokio::spawn(scan_trigger_task(
                    Arc::clone(&self.inner),
                    cancel.clone(),
                )));
            }

            self.inner.signal_tx.store(Some(Arc::new(signal_tx)));
            lifecycle.running = Some(RunningTasks {
                cancel,
                worker,
                helpers,
            });
        }

        info!(
            max_entry_age = ?self.inner.config.max_entry_age,
            scan_interval = ?self.inner.config.scan_interval,
            "wifi tracker started"
        );

        self.handle_signal(Signal::RadioStateChanged).await?;
        Ok(())
    }

    /// Cancel the background tasks and wait for them. Callbacks already
    /// queued are delivered before this returns. Entries survive for the
    /// next [`start()`](Self::start).
    pub async fn stop(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        let Some(running) = lifecycle.running.take() else {
            return;
        };

        self.inner.signal_tx.store(None);
        running.cancel.cancel();

        let store = match running.worker.await {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "worker task ended abnormally, starting over with an empty store");
                self.fresh_store()
            }
        };
        lifecycle.parked = Some(store);

        for handle in running.helpers {
            let _ = handle.await;
        }
        info!("wifi tracker stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.signal_tx.load().is_some()
    }

    fn fresh_store(&self) -> EntryStore {
        EntryStore::with_feed(&self.inner.config, Arc::clone(&self.inner.feed))
    }

    // ── Signal delivery ──────────────────────────────────────────

    /// Deliver a signal and wait until the worker has applied it.
    pub async fn handle_signal(&self, signal: Signal) -> Result<SignalOutcome, CoreError> {
        let tx = self
            .inner
            .signal_tx
            .load_full()
            .ok_or(CoreError::TrackerStopped)?;
        let (response_tx, response_rx) = oneshot::channel();

        tx.send(SignalEnvelope {
            signal,
            response_tx: Some(response_tx),
        })
        .await
        .map_err(|_| CoreError::TrackerStopped)?;

        response_rx.await.map_err(|_| CoreError::TrackerStopped)
    }

    /// A handle for fire-and-forget delivery from non-async contexts.
    pub fn signal_sender(&self) -> SignalSender {
        SignalSender {
            inner: Arc::clone(&self.inner),
        }
    }

    // ── State observation ────────────────────────────────────────

    /// The last published entry list. Lock-free; never blocks on the worker.
    pub fn wifi_entries(&self) -> Snapshot {
        self.inner.feed.load()
    }

    /// The last radio state read from the source.
    pub fn wifi_state(&self) -> RadioState {
        *self.inner.radio_state.borrow()
    }

    /// Subscribe to radio state changes.
    pub fn watch_wifi_state(&self) -> watch::Receiver<RadioState> {
        self.inner.radio_state.subscribe()
    }

    pub fn subscribe_entries(&self) -> EntryStream {
        EntryStream::new(Arc::clone(&self.inner.feed))
    }

    /// Subscribe to the event broadcast stream.
    pub fn events(&self) -> broadcast::Receiver<TrackerEvent> {
        self.inner.event_tx.subscribe()
    }
}

// ── SignalSender ─────────────────────────────────────────────────

/// Non-blocking signal handle, safe to use from any thread.
#[derive(Clone)]
pub struct SignalSender {
    inner: Arc<TrackerInner>,
}

impl SignalSender {
    pub fn send(&self, signal: Signal) -> Result<(), CoreError> {
        let tx = self
            .inner
            .signal_tx
            .load_full()
            .ok_or(CoreError::TrackerStopped)?;

        tx.try_send(SignalEnvelope {
            signal,
            response_tx: None,
        })
        .map_err(|e| match e {
            TrySendError::Full(_) => CoreError::SignalQueueFull {
                capacity: SIGNAL_CHANNEL_SIZE,
            },
            TrySendError::Closed(_) => CoreError::TrackerStopped,
        })
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Sole owner of the store while running. Returns it on cancellation.
async fn worker_task(
    inner: Arc<TrackerInner>,
    mut store: EntryStore,
    mut rx: mpsc::Receiver<SignalEnvelope>,
    notify_tx: mpsc::UnboundedSender<TrackerEvent>,
    cancel: CancellationToken,
) -> EntryStore {
    let mut first_state_read = true;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let outcome = match envelope.signal {
                    Signal::RadioStateChanged => {
                        let outcome = apply_radio_state(&inner, &notify_tx, first_state_read);
                        first_state_read = false;
                        outcome
                    }
                    Signal::ScanResultsAvailable { updated } => {
                        apply_scan_results(&inner, &mut store, &notify_tx, updated)
                    }
                };
                if let Some(tx) = envelope.response_tx {
                    let _ = tx.send(outcome);
                }
            }
        }
    }

    store
}

/// Record the source's radio state. The first read after start always
/// notifies; later reads notify only on change.
fn apply_radio_state(
    inner: &TrackerInner,
    notify_tx: &mpsc::UnboundedSender<TrackerEvent>,
    force_notify: bool,
) -> SignalOutcome {
    let state = inner.source.radio_state();
    let modified = inner.radio_state.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            *current = state;
            true
        }
    });

    let changed = modified || force_notify;
    if changed {
        debug!(%state, "radio state recorded");
        let _ = notify_tx.send(TrackerEvent::StateChanged(state));
    }
    SignalOutcome::RadioState { state, changed }
}

fn apply_scan_results(
    inner: &TrackerInner,
    store: &mut EntryStore,
    notify_tx: &mpsc::UnboundedSender<TrackerEvent>,
    succeeded: bool,
) -> SignalOutcome {
    let natives = match inner.source.scan_results() {
        Ok(natives) => natives,
        Err(e) => {
            warn!(error = %e, "scan results unavailable, keeping previous entries");
            return SignalOutcome::ScanSourceUnavailable;
        }
    };

    let now = inner.clock.now_millis();
    let report = store.ingest(IngestionCycle::from_native(natives, succeeded, now));
    debug!(
        succeeded,
        inserted = report.inserted,
        updated = report.updated,
        ignored_older = report.ignored_older,
        evicted = report.evicted,
        retained = report.retained,
        max_age_ms = report.effective_max_age.as_millis(),
        "scan cycle applied"
    );

    let _ = notify_tx.send(TrackerEvent::EntriesChanged(store.snapshot()));
    SignalOutcome::Ingested(report)
}

/// Deliver callbacks and broadcast events. Runs until the worker drops its
/// sender, so everything the worker queued is delivered.
async fn notifier_task(inner: Arc<TrackerInner>, mut rx: mpsc::UnboundedReceiver<TrackerEvent>) {
    while let Some(event) = rx.recv().await {
        match &event {
            TrackerEvent::EntriesChanged(_) => inner.callback.on_wifi_entries_changed(),
            TrackerEvent::StateChanged(_) => inner.callback.on_wifi_state_changed(),
        }
        // No subscribers is fine.
        let _ = inner.event_tx.send(event);
    }
}

/// Ask the source for a scan every `scan_interval` while the radio is on.
async fn scan_trigger_task(inner: Arc<TrackerInner>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(inner.config.scan_interval);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !inner.radio_state.borrow().is_enabled() {
                    continue;
                }
                if let Err(e) = inner.source.request_scan() {
                    warn!(error = %e, "scan request failed");
                }
            }
        }
    }
}
