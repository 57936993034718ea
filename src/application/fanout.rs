//! Subscriber fan-out of published poll snapshots.
//!
//! Every completed poll cycle is broadcast to all live subscribers. A new
//! subscriber first receives whatever the cache currently holds, so nobody
//! waits a full poll interval for their first update.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use super::cache::{EdgeCache, PollSnapshot};

/// Default capacity of the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 16;

/// Broadcasts poll snapshots to subscribers.
pub struct Publisher {
    cache: Arc<EdgeCache>,
    tx: broadcast::Sender<Arc<PollSnapshot>>,
}

impl Publisher {
    /// Create a publisher over `cache` with the given channel capacity.
    #[must_use]
    pub fn new(cache: Arc<EdgeCache>, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { cache, tx }
    }

    /// Fan a freshly published snapshot out to every subscriber.
    ///
    /// Returns the number of subscribers that will observe it.
    pub fn publish(&self, snapshot: Arc<PollSnapshot>) -> usize {
        // no subscribers is fine
        self.tx.send(snapshot).unwrap_or(0)
    }

    /// Attach a new subscriber.
    ///
    /// The returned handle yields the current snapshot first, then every
    /// subsequent publication. Dropping it detaches the subscriber.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        // Subscribe before reading the cache so a concurrent publish is
        // delivered rather than lost.
        let rx = self.tx.subscribe();
        let initial = self.cache.latest();
        debug!(subscribers = self.tx.receiver_count(), "Subscriber attached");
        Subscription {
            cache: Arc::clone(&self.cache),
            rx,
            pending: initial,
            last: None,
        }
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live subscription handle.
pub struct Subscription {
    cache: Arc<EdgeCache>,
    rx: broadcast::Receiver<Arc<PollSnapshot>>,
    pending: Option<Arc<PollSnapshot>>,
    last: Option<Arc<PollSnapshot>>,
}

impl Subscription {
    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the publisher is gone. A subscriber that falls
    /// behind skips straight to the newest cached snapshot.
    pub async fn next(&mut self) -> Option<Arc<PollSnapshot>> {
        loop {
            let candidate = match self.pending.take() {
                Some(snapshot) => snapshot,
                None => match self.rx.recv().await {
                    Ok(snapshot) => snapshot,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Subscriber lagged; jumping to latest");
                        self.rx = self.rx.resubscribe();
                        match self.cache.latest() {
                            Some(snapshot) => snapshot,
                            None => continue,
                        }
                    }
                    Err(RecvError::Closed) => return None,
                },
            };

            if self
                .last
                .as_ref()
                .is_some_and(|last| Arc::ptr_eq(last, &candidate))
            {
                continue;
            }
            self.last = Some(Arc::clone(&candidate));
            return Some(candidate);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!("Subscriber detached");
    }
}
