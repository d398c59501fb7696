use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;

use super::envelope::Envelope;
use super::error::{PushError, TryPushError};
use super::id::SubscriberId;

/// Writing end of a subscriber queue.
///
/// Owned by a registry. Not cloneable: one queue has one owner, and dropping
/// the writer closes the queue.
pub struct QueueWriter<T> {
    id: SubscriberId,
    capacity: usize,
    tx: Option<mpsc::Sender<Envelope<T>>>,
}

impl<T> QueueWriter<T> {
    pub(super) fn new(id: SubscriberId, capacity: usize, tx: mpsc::Sender<Envelope<T>>) -> Self {
        Self {
            id,
            capacity,
            tx: Some(tx),
        }
    }

    /// Identity of this queue.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Capacity of the queue (`0` = rendezvous).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` once [`close`](Self::close) ran.
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    /// `true` once the reader was dropped.
    pub fn is_detached(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| tx.is_closed())
    }

    /// Closes the queue; the reader drains what is buffered, then sees the end.
    ///
    /// Idempotent: returns `true` only for the call that closed it.
    pub fn close(&mut self) -> bool {
        self.tx.take().is_some()
    }

    /// Enqueues without waiting.
    ///
    /// A zero-capacity queue has no buffer, so this always returns
    /// [`TryPushError::Full`] for it (unless the queue is closed or detached).
    pub fn try_push(&self, value: T) -> Result<(), TryPushError<T>> {
        let Some(tx) = &self.tx else {
            return Err(TryPushError::Closed(value));
        };
        if self.capacity == 0 {
            return Err(if tx.is_closed() {
                TryPushError::Detached(value)
            } else {
                TryPushError::Full(value)
            });
        }

        tx.try_send(Envelope::buffered(value)).map_err(|e| match e {
            TrySendError::Full(env) => TryPushError::Full(env.into_value()),
            TrySendError::Closed(env) => TryPushError::Detached(env.into_value()),
        })
    }

    /// Enqueues, waiting for room if the queue is full.
    ///
    /// On a zero-capacity queue the call completes only after the reader took
    /// the value. If the returned future is dropped before that, the value is
    /// retracted and the reader never sees it.
    ///
    /// ### Cancel safety
    /// Dropping the future never leaves a partially delivered value behind.
    pub async fn push(&self, value: T) -> Result<(), PushError> {
        let Some(tx) = &self.tx else {
            return Err(PushError::Closed);
        };
        if self.capacity > 0 {
            return tx
                .send(Envelope::buffered(value))
                .await
                .map_err(|_| PushError::Detached);
        }

        let (ack, taken) = oneshot::channel();
        tx.send(Envelope::handoff(value, ack))
            .await
            .map_err(|_| PushError::Detached)?;
        // The reader drops the envelope unacknowledged only when it goes away.
        taken.await.map_err(|_| PushError::Detached)
    }
}

impl<T> fmt::Debug for QueueWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueWriter")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}
