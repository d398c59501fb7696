//! # Unsynchronized subscriber registry.
//!
//! [`NoSyncRegistry`] keeps the live subscriber queues of one broadcaster.
//! It has no internal locking: every method takes `&mut self` (or `&self` for
//! reads), so the owner serializes access. The broadcast loop owns one; wrap
//! it in [`SyncRegistry`](super::SyncRegistry) to share it between tasks.
//!
//! ## Architecture
//! ```text
//! send_or_*(msg)
//!     │
//!     ├──► writer 1 ──push/try_push──► [queue 1] ──► subscriber 1
//!     ├──► writer 2 ──push/try_push──► [queue 2] ──► subscriber 2
//!     └──► writer N ──push/try_push──► [queue N] ──► subscriber N
//!
//!   full queue:   Wait → park until room / token fires
//!                 Skip → count, move on
//!                 Unsubscribe → close + remove after the scan
//!   reader gone:  prune after the scan (not counted)
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::contract::Registry;
use crate::queue::{self, PushError, QueueWriter, SubscriberId, Subscription, TryPushError};

/// Result of a read-only fan-out scan.
pub(super) struct Scan<R> {
    pub(super) result: R,
    pub(super) detached: Vec<SubscriberId>,
}

/// Subscriber registry for externally serialized callers.
pub struct NoSyncRegistry<T> {
    subscribers: HashMap<SubscriberId, QueueWriter<T>>,
    capacity: usize,
}

impl<T> NoSyncRegistry<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an empty registry; `subscribe()` hands out queues of `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: HashMap::new(),
            capacity,
        }
    }

    /// Default capacity of queues created by [`subscribe`](Self::subscribe).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a queue of the default capacity, registers it, returns the reader.
    pub fn subscribe(&mut self) -> Subscription<T> {
        self.subscribe_with_capacity(self.capacity)
    }

    /// Creates a queue of a custom capacity, registers it, returns the reader.
    pub fn subscribe_with_capacity(&mut self, capacity: usize) -> Subscription<T> {
        let (writer, reader) = queue::channel(capacity);
        self.add_subscriber(writer);
        reader
    }

    /// Registers a queue the caller created with [`queue::channel`].
    ///
    /// Adding the same queue twice is not meaningful; the entry is replaced.
    pub fn add_subscriber(&mut self, writer: QueueWriter<T>) {
        let id = writer.id();
        self.subscribers.insert(id, writer);
        tracing::debug!(
            subscriber = %id,
            subscribers = self.subscribers.len(),
            "subscriber registered"
        );
    }

    /// Removes and closes the queue. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        match self.subscribers.remove(&id) {
            Some(mut writer) => {
                writer.close();
                tracing::debug!(
                    subscriber = %id,
                    subscribers = self.subscribers.len(),
                    "subscriber removed"
                );
                true
            }
            None => false,
        }
    }

    /// Closes and removes every queue. Returns how many were closed.
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        for (_, mut writer) in self.subscribers.drain() {
            if writer.close() {
                closed += 1;
            }
        }
        closed
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// `true` if no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// `true` if the queue is registered.
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    /// Delivers to every subscriber, waiting on full (or zero-capacity) queues.
    ///
    /// Returns `false` as soon as `token` fires. Subscribers visited before
    /// that keep the value; the rest do not get it.
    pub async fn send_or_wait(&mut self, token: &CancellationToken, message: T) -> bool {
        let scan = self.scan_wait(token, message).await;
        self.prune(&scan.detached);
        scan.result
    }

    /// Delivers to every subscriber with room. Returns how many were skipped.
    pub fn send_or_skip(&mut self, message: T) -> usize {
        let scan = self.scan_skip(message);
        self.prune(&scan.detached);
        scan.result
    }

    /// Delivers to every subscriber with room; full ones are closed and
    /// removed before returning. Returns how many were removed.
    pub fn send_or_unsubscribe(&mut self, message: T) -> usize {
        let mut full = Vec::new();
        let mut detached = Vec::new();

        for (id, writer) in &self.subscribers {
            match writer.try_push(message.clone()) {
                Ok(()) => {}
                Err(TryPushError::Full(_)) => full.push(*id),
                Err(TryPushError::Closed(_) | TryPushError::Detached(_)) => detached.push(*id),
            }
        }

        for id in &full {
            if let Some(mut writer) = self.subscribers.remove(id) {
                writer.close();
                tracing::warn!(
                    subscriber = %id,
                    capacity = writer.capacity(),
                    "subscriber queue full, unsubscribed"
                );
            }
        }
        self.prune(&detached);
        full.len()
    }

    /// Blocking fan-out without touching the map.
    pub(super) async fn scan_wait(
        &self,
        token: &CancellationToken,
        message: T,
    ) -> Scan<bool> {
        let mut detached = Vec::new();

        for (id, writer) in &self.subscribers {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Scan { result: false, detached };
                }
                res = writer.push(message.clone()) => {
                    if let Err(PushError::Closed | PushError::Detached) = res {
                        detached.push(*id);
                    }
                }
            }
        }

        Scan {
            result: true,
            detached,
        }
    }

    /// Non-blocking fan-out without touching the map.
    pub(super) fn scan_skip(&self, message: T) -> Scan<usize> {
        let mut skipped = 0;
        let mut detached = Vec::new();

        for (id, writer) in &self.subscribers {
            match writer.try_push(message.clone()) {
                Ok(()) => {}
                Err(TryPushError::Full(_)) => skipped += 1,
                Err(TryPushError::Closed(_) | TryPushError::Detached(_)) => detached.push(*id),
            }
        }

        Scan {
            result: skipped,
            detached,
        }
    }

    /// Drops queues whose reader is gone.
    pub(super) fn prune(&mut self, ids: &[SubscriberId]) {
        for id in ids {
            if self.subscribers.remove(id).is_some() {
                tracing::debug!(subscriber = %id, "subscriber dropped its queue, pruned");
            }
        }
    }
}

#[async_trait]
impl<T> Registry<T> for NoSyncRegistry<T>
where
    T: Clone + Send + 'static,
{
    async fn add_subscriber(&mut self, writer: QueueWriter<T>) {
        NoSyncRegistry::add_subscriber(self, writer);
    }

    async fn subscribe(&mut self) -> Subscription<T> {
        NoSyncRegistry::subscribe(self)
    }

    async fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        NoSyncRegistry::unsubscribe(self, id)
    }

    async fn close_all(&mut self) -> usize {
        NoSyncRegistry::close_all(self)
    }

    async fn len(&self) -> usize {
        NoSyncRegistry::len(self)
    }

    async fn send_or_wait(&mut self, token: &CancellationToken, message: T) -> bool {
        NoSyncRegistry::send_or_wait(self, token, message).await
    }

    async fn send_or_skip(&mut self, message: T) -> usize {
        NoSyncRegistry::send_or_skip(self, message)
    }

    async fn send_or_unsubscribe(&mut self, message: T) -> usize {
        NoSyncRegistry::send_or_unsubscribe(self, message)
    }
}
