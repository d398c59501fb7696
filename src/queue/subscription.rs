use std::fmt;

use futures::Stream;
use tokio::sync::mpsc::{self, error::TryRecvError as MpscTryRecvError};

use super::envelope::Envelope;
use super::error::TryRecvError;
use super::id::SubscriberId;

/// Reading end of a subscriber queue.
///
/// Returned by every `subscribe` call. Values arrive in the order the
/// producer emitted them. Dropping the subscription detaches the queue: the
/// owner stops delivering to it instead of waiting for a reader that is gone.
pub struct Subscription<T> {
    id: SubscriberId,
    capacity: usize,
    rx: mpsc::Receiver<Envelope<T>>,
}

impl<T> Subscription<T> {
    pub(super) fn new(id: SubscriberId, capacity: usize, rx: mpsc::Receiver<Envelope<T>>) -> Self {
        Self { id, capacity, rx }
    }

    /// Identity of this subscriber; pass it to `unsubscribe`.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Capacity of the queue (`0` = rendezvous).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values buffered and not yet received.
    ///
    /// A rendezvous queue never reports buffered values.
    pub fn len(&self) -> usize {
        if self.capacity == 0 {
            0
        } else {
            self.rx.len()
        }
    }

    /// `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` once the owner closed the queue (buffered values may remain).
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }

    /// Receives the next value, waiting for one if necessary.
    ///
    /// Returns `None` once the queue is closed and drained.
    ///
    /// ### Cancel safety
    /// Cancel safe: a value is only removed from the queue when it is returned.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            if let Some(value) = self.rx.recv().await?.accept() {
                return Some(value);
            }
        }
    }

    /// Receives a value without waiting.
    ///
    /// On a zero-capacity queue this succeeds only while a writer is parked on
    /// the hand-off.
    pub fn try_recv(&mut self) -> Result<T, TryRecvError> {
        loop {
            match self.rx.try_recv() {
                Ok(env) => {
                    if let Some(value) = env.accept() {
                        return Ok(value);
                    }
                }
                Err(MpscTryRecvError::Empty) => return Err(TryRecvError::Empty),
                Err(MpscTryRecvError::Disconnected) => return Err(TryRecvError::Closed),
            }
        }
    }

    /// Turns the subscription into a [`Stream`] that ends when the queue closes.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send
    where
        T: Send + 'static,
    {
        futures::stream::unfold(self, |mut sub| async move {
            let value = sub.recv().await?;
            Some((value, sub))
        })
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<T> From<&Subscription<T>> for SubscriberId {
    fn from(sub: &Subscription<T>) -> Self {
        sub.id()
    }
}
