// ── Reactive entry streams ──
//
// Subscription types for consuming entry changes from the EntryStore.

mod filter;

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub use filter::EntryFilter;

use crate::store::{EntryFeed, Snapshot};

/// A subscription to the live entry list.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a `Stream`.
pub struct EntryStream {
    current: Snapshot,
    feed: Arc<EntryFeed>,
    receiver: watch::Receiver<u64>,
}

impl EntryStream {
    pub(crate) fn new(feed: Arc<EntryFeed>) -> Self {
        let mut receiver = feed.subscribe();
        receiver.mark_unchanged();
        let current = feed.load();
        Self {
            current,
            feed,
            receiver,
        }
    }

    /// Get the snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Get the latest published snapshot.
    pub fn latest(&self) -> Snapshot {
        self.feed.load()
    }

    /// Wait for the next publish, returning the new snapshot.
    /// Returns `None` once the store's feed has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update();
        let snap = self.feed.load();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The stream yields the current snapshot first, then one per publish.
    /// Publishes that land between polls coalesce into the latest.
    pub fn into_stream(self) -> EntryWatchStream {
        EntryWatchStream {
            inner: WatchStream::new(self.receiver),
            feed: self.feed,
        }
    }
}

/// `Stream` adapter backed by the store's version channel.
pub struct EntryWatchStream {
    inner: WatchStream<u64>,
    feed: Arc<EntryFeed>,
}

impl Stream for EntryWatchStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(_version)) => Poll::Ready(Some(self.feed.load())),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
