//! # Registry capability set
//!
//! [`Registry`] is the contract shared by [`NoSyncRegistry`](super::NoSyncRegistry)
//! and [`SyncRegistry`](super::SyncRegistry): register, remove, close, count,
//! and the three send operations that back the delivery policies.
//!
//! ## Contract
//! - `unsubscribe` of an unknown id is a no-op returning `false`, never an error.
//! - Queues are closed **only** by the registry that owns them, exactly once.
//! - `send_or_wait` returns `false` as soon as the token fires; values already
//!   handed to some subscribers stay delivered.
//! - Queues whose reader was dropped are pruned by the send operations and are
//!   not counted as skipped or evicted.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::policies::{Delivery, DeliveryPolicy};
use crate::queue::{QueueWriter, SubscriberId, Subscription};

/// Contract for subscriber registries.
#[async_trait]
pub trait Registry<T>: Send + Sync
where
    T: Clone + Send + 'static,
{
    /// Registers an existing queue. Re-adding the same queue replaces it.
    async fn add_subscriber(&mut self, writer: QueueWriter<T>);

    /// Creates a queue with the registry's default capacity and registers it.
    async fn subscribe(&mut self) -> Subscription<T>;

    /// Removes and closes the queue. Returns whether it was registered.
    async fn unsubscribe(&mut self, id: SubscriberId) -> bool;

    /// Closes and removes every queue. Returns how many were closed.
    async fn close_all(&mut self) -> usize;

    /// Number of live subscribers.
    async fn len(&self) -> usize;

    /// `true` if no subscriber is registered.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Delivers to every subscriber, waiting on full queues.
    ///
    /// Returns `true` if every subscriber got the value before `token` fired.
    async fn send_or_wait(&mut self, token: &CancellationToken, message: T) -> bool;

    /// Delivers to every subscriber with room. Returns how many were skipped.
    async fn send_or_skip(&mut self, message: T) -> usize;

    /// Delivers to every subscriber with room; full ones are closed and removed.
    /// Returns how many were removed.
    async fn send_or_unsubscribe(&mut self, message: T) -> usize;

    /// Applies the send operation matching `policy`.
    async fn deliver(
        &mut self,
        policy: DeliveryPolicy,
        token: &CancellationToken,
        message: T,
    ) -> Delivery {
        match policy {
            DeliveryPolicy::Wait => {
                if self.send_or_wait(token, message).await {
                    Delivery::Delivered
                } else {
                    Delivery::Cancelled
                }
            }
            DeliveryPolicy::Skip => Delivery::Skipped(self.send_or_skip(message).await),
            DeliveryPolicy::Unsubscribe => {
                Delivery::Evicted(self.send_or_unsubscribe(message).await)
            }
        }
    }
}
