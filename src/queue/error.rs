use thiserror::Error;

/// Error returned by [`QueueWriter::push`](super::QueueWriter::push).
///
/// The value is dropped with the failed push.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The queue was closed by its owner.
    #[error("subscriber queue closed")]
    Closed,

    /// The reading side was dropped; nobody will ever drain the queue.
    #[error("subscriber dropped its queue")]
    Detached,
}

/// Error returned by [`QueueWriter::try_push`](super::QueueWriter::try_push).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TryPushError<T> {
    /// No free slot right now (always the case for a zero-capacity queue).
    #[error("subscriber queue full")]
    Full(T),

    /// The queue was closed by its owner.
    #[error("subscriber queue closed")]
    Closed(T),

    /// The reading side was dropped.
    #[error("subscriber dropped its queue")]
    Detached(T),
}

impl<T> TryPushError<T> {
    /// Returns the value that could not be delivered.
    pub fn into_inner(self) -> T {
        match self {
            TryPushError::Full(v) | TryPushError::Closed(v) | TryPushError::Detached(v) => v,
        }
    }

    /// `true` if the push failed only because the queue had no room.
    pub fn is_full(&self) -> bool {
        matches!(self, TryPushError::Full(_))
    }
}

/// Error returned by [`Subscription::try_recv`](super::Subscription::try_recv).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// Nothing buffered yet; the queue is still open.
    #[error("subscriber queue empty")]
    Empty,

    /// The queue is closed and fully drained.
    #[error("subscriber queue closed")]
    Closed,
}
