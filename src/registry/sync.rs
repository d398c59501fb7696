//! # Shared subscriber registry.
//!
//! [`SyncRegistry`] wraps a [`NoSyncRegistry`] in an async read/write lock so
//! several tasks can register, remove and send concurrently. Clones share the
//! same subscribers.
//!
//! ## Locking
//! ```text
//! len / contains                     → read
//! send_or_wait / send_or_skip        → read while delivering, write to prune
//! subscribe / add / unsubscribe      → write
//! close_all / send_or_unsubscribe    → write
//! ```
//!
//! `send_or_wait` holds the read lock while parked on a full queue, so writers
//! (`subscribe`, `unsubscribe`) wait behind it. Concurrent readers do not.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::contract::Registry;
use super::nosync::NoSyncRegistry;
use crate::queue::{QueueWriter, SubscriberId, Subscription};

/// Subscriber registry safe to share between tasks.
pub struct SyncRegistry<T> {
    inner: Arc<RwLock<NoSyncRegistry<T>>>,
}

impl<T> Clone for SyncRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SyncRegistry<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an empty registry; `subscribe()` hands out queues of `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self::from_inner(NoSyncRegistry::new(capacity))
    }

    /// Wraps an existing unsynchronized registry.
    pub fn from_inner(registry: NoSyncRegistry<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Creates a queue of the default capacity, registers it, returns the reader.
    pub async fn subscribe(&self) -> Subscription<T> {
        self.inner.write().await.subscribe()
    }

    /// Creates a queue of a custom capacity, registers it, returns the reader.
    pub async fn subscribe_with_capacity(&self, capacity: usize) -> Subscription<T> {
        self.inner.write().await.subscribe_with_capacity(capacity)
    }

    /// Registers a queue the caller created.
    pub async fn add_subscriber(&self, writer: QueueWriter<T>) {
        self.inner.write().await.add_subscriber(writer);
    }

    /// Removes and closes the queue. Returns whether it was registered.
    pub async fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.inner.write().await.unsubscribe(id)
    }

    /// Closes and removes every queue. Returns how many were closed.
    pub async fn close_all(&self) -> usize {
        self.inner.write().await.close_all()
    }

    /// Number of live subscribers.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// `true` if no subscriber is registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// `true` if the queue is registered.
    pub async fn contains(&self, id: SubscriberId) -> bool {
        self.inner.read().await.contains(id)
    }

    /// Delivers to every subscriber, waiting on full queues, under the read lock.
    ///
    /// Returns `false` as soon as `token` fires.
    pub async fn send_or_wait(&self, token: &CancellationToken, message: T) -> bool {
        let scan = self.inner.read().await.scan_wait(token, message).await;
        if !scan.detached.is_empty() {
            self.inner.write().await.prune(&scan.detached);
        }
        scan.result
    }

    /// Delivers to every subscriber with room, under the read lock.
    /// Returns how many were skipped.
    pub async fn send_or_skip(&self, message: T) -> usize {
        let scan = self.inner.read().await.scan_skip(message);
        if !scan.detached.is_empty() {
            self.inner.write().await.prune(&scan.detached);
        }
        scan.result
    }

    /// Delivers to every subscriber with room; full ones are closed and
    /// removed. Takes the write lock. Returns how many were removed.
    pub async fn send_or_unsubscribe(&self, message: T) -> usize {
        self.inner.write().await.send_or_unsubscribe(message)
    }
}

#[async_trait]
impl<T> Registry<T> for SyncRegistry<T>
where
    T: Clone + Send + 'static,
{
    async fn add_subscriber(&mut self, writer: QueueWriter<T>) {
        SyncRegistry::add_subscriber(self, writer).await;
    }

    async fn subscribe(&mut self) -> Subscription<T> {
        SyncRegistry::subscribe(self).await
    }

    async fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        SyncRegistry::unsubscribe(self, id).await
    }

    async fn close_all(&mut self) -> usize {
        SyncRegistry::close_all(self).await
    }

    async fn len(&self) -> usize {
        SyncRegistry::len(self).await
    }

    async fn send_or_wait(&mut self, token: &CancellationToken, message: T) -> bool {
        SyncRegistry::send_or_wait(self, token, message).await
    }

    async fn send_or_skip(&mut self, message: T) -> usize {
        SyncRegistry::send_or_skip(self, message).await
    }

    async fn send_or_unsubscribe(&mut self, message: T) -> usize {
        SyncRegistry::send_or_unsubscribe(self, message).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_clones_share_subscribers() {
        let reg = SyncRegistry::<u32>::new(2);
        let other = reg.clone();

        let mut sub = reg.subscribe().await;
        assert_eq!(other.len().await, 1);
        assert!(other.contains(sub.id()).await);

        assert_eq!(other.send_or_skip(7).await, 0);
        assert_eq!(sub.recv().await, Some(7));
    }

    #[tokio::test]
    async fn test_concurrent_skip_senders() {
        let reg = SyncRegistry::new(100);
        let mut sub = reg.subscribe().await;

        let mut handles = Vec::new();
        for t in 0..4u32 {
            let reg = reg.clone();
            handles.push(tokio::spawn(async move {
                let mut skipped = 0;
                for i in 0..10 {
                    skipped += reg.send_or_skip(t * 10 + i).await;
                }
                skipped
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap(), 0);
        }

        let mut got = Vec::new();
        while let Ok(v) = sub.try_recv() {
            got.push(v);
        }
        got.sort_unstable();
        assert_eq!(got, (0..40).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_concurrent_subscribe_while_sending() {
        let reg = SyncRegistry::new(1);
        let sender = reg.clone();

        let send = tokio::spawn(async move {
            for i in 0..50u32 {
                sender.send_or_skip(i).await;
            }
        });
        let subs = futures::future::join_all((0..10).map(|_| reg.subscribe())).await;
        send.await.unwrap();

        assert_eq!(subs.len(), 10);
        assert_eq!(reg.len().await, 10);
    }

    #[tokio::test]
    async fn test_send_or_unsubscribe_evicts() {
        let reg = SyncRegistry::new(1);
        let mut sub = reg.subscribe().await;

        assert_eq!(reg.send_or_unsubscribe(1).await, 0);
        assert_eq!(reg.send_or_unsubscribe(2).await, 1);
        assert!(reg.is_empty().await);
        assert_eq!(sub.recv().await, Some(1));
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_reader_drains() {
        let reg = SyncRegistry::new(1);
        let mut sub = reg.subscribe().await;
        let token = CancellationToken::new();

        assert!(reg.send_or_wait(&token, 1).await);
        assert!(timeout(SHORT, reg.send_or_wait(&token, 2)).await.is_err());

        assert_eq!(sub.recv().await, Some(1));
        assert!(reg.send_or_wait(&token, 2).await);
        assert_eq!(sub.recv().await, Some(2));
    }

    #[tokio::test]
    async fn test_wait_prunes_dropped_reader() {
        let reg = SyncRegistry::new(0);
        drop(reg.subscribe().await);
        let token = CancellationToken::new();

        assert_eq!(timeout(SHORT, reg.send_or_wait(&token, 1)).await, Ok(true));
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn test_close_all_through_trait() {
        let mut reg = SyncRegistry::<u32>::new(1);
        let mut sub = reg.subscribe().await;

        assert_eq!(Registry::close_all(&mut reg).await, 1);
        assert!(Registry::is_empty(&reg).await);
        assert_eq!(sub.recv().await, None);
    }
}
