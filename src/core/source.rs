//! # Value sources for a broadcaster.
//!
//! [`Source`] is the single input of a broadcast loop. A source yields values
//! until it returns `None`; after that the loop stops and closes every
//! subscriber.
//!
//! Implementations:
//! - `tokio::sync::mpsc::Receiver<T>` capacity is the channel's buffer size
//! - [`StreamSource`] any `futures::Stream`, unbuffered unless told otherwise

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;

/// Input stream of a broadcaster.
///
/// ### Cancel safety
/// `next` is raced against cancellation and subscribe requests in a
/// `select!`. Dropping an unfinished `next` future must not lose a value.
#[async_trait]
pub trait Source<T>: Send + 'static {
    /// Next value, or `None` once the source is closed.
    async fn next(&mut self) -> Option<T>;

    /// How many values the source buffers (`0` = unbuffered).
    ///
    /// Used by [`Broadcaster::best_effort`](super::Broadcaster::best_effort)
    /// to size subscriber queues.
    fn capacity(&self) -> usize {
        0
    }
}

#[async_trait]
impl<T> Source<T> for mpsc::Receiver<T>
where
    T: Send + 'static,
{
    async fn next(&mut self) -> Option<T> {
        self.recv().await
    }

    fn capacity(&self) -> usize {
        self.max_capacity()
    }
}

/// Adapts a [`Stream`] into a [`Source`].
pub struct StreamSource<S> {
    stream: S,
    capacity: usize,
}

impl<S> StreamSource<S> {
    /// Wraps an unbuffered stream.
    pub fn new(stream: S) -> Self {
        Self::with_capacity(stream, 0)
    }

    /// Wraps a stream that buffers `capacity` values upstream.
    pub fn with_capacity(stream: S, capacity: usize) -> Self {
        Self { stream, capacity }
    }
}

#[async_trait]
impl<S, T> Source<T> for StreamSource<S>
where
    S: Stream<Item = T> + Unpin + Send + 'static,
    T: Send + 'static,
{
    async fn next(&mut self) -> Option<T> {
        self.stream.next().await
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mpsc_source() {
        let (tx, mut rx) = mpsc::channel(8);
        assert_eq!(Source::capacity(&rx), 8);

        tx.send(1u32).await.unwrap();
        drop(tx);
        assert_eq!(Source::next(&mut rx).await, Some(1));
        assert_eq!(Source::next(&mut rx).await, None);
    }

    #[tokio::test]
    async fn test_stream_source() {
        let mut src = StreamSource::new(futures::stream::iter(vec![1u32, 2]));
        assert_eq!(src.capacity(), 0);
        assert_eq!(src.next().await, Some(1));
        assert_eq!(src.next().await, Some(2));
        assert_eq!(src.next().await, None);

        let src = StreamSource::with_capacity(futures::stream::empty::<u32>(), 4);
        assert_eq!(Source::<u32>::capacity(&src), 4);
    }
}
