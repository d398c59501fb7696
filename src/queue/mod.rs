//! # Bounded per-subscriber queues.
//!
//! Every subscriber gets its own queue: a FIFO of fixed capacity with one
//! writing end ([`QueueWriter`], owned by a registry) and one reading end
//! ([`Subscription`], handed to the subscriber). Both ends wrap a
//! `tokio::sync::mpsc` channel.
//!
//! ```text
//!   registry ── QueueWriter ──► [ v1 v2 v3 _ _ ] ──► Subscription ── subscriber
//!               push/try_push      capacity C         recv/try_recv
//!               close                                 (drop = detach)
//! ```
//!
//! ## Rules
//! - **Identity**: each queue has a unique [`SubscriberId`]; equal contents do not make equal queues.
//! - **Capacity 0**: rendezvous. `push` completes only when the reader took the value; `try_push` always reports `Full`.
//! - **Capacity bound**: capacities above [`MAX_CAPACITY`] are clamped to it; nothing is allocated up front.
//! - **Close**: idempotent, writer side only. The reader drains buffered values, then observes the end.
//! - **Detach**: dropping the [`Subscription`] makes every later push fail fast with `Detached`.
//! - **Writer drop**: closes the queue.

mod envelope;
mod error;
mod id;
mod subscription;
mod writer;

use tokio::sync::{mpsc, Semaphore};

pub use error::{PushError, TryPushError, TryRecvError};
pub use id::SubscriberId;
pub use subscription::Subscription;
pub use writer::QueueWriter;

/// Largest capacity a queue can have.
pub const MAX_CAPACITY: usize = Semaphore::MAX_PERMITS;

/// Creates a connected writer/reader pair with the given capacity.
///
/// Capacity `0` creates a rendezvous queue (one in-flight hand-off).
pub fn channel<T>(capacity: usize) -> (QueueWriter<T>, Subscription<T>) {
    let capacity = capacity.min(MAX_CAPACITY);
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let id = SubscriberId::next();
    (
        QueueWriter::new(id, capacity, tx),
        Subscription::new(id, capacity, rx),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use tokio::time::timeout;

    use super::*;

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_fifo_order() {
        let (tx, mut rx) = channel(4);
        for i in 0..4 {
            tx.try_push(i).unwrap();
        }
        assert_eq!(rx.len(), 4);
        for i in 0..4 {
            assert_eq!(rx.recv().await, Some(i));
        }
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn test_try_push_full() {
        let (tx, mut rx) = channel(1);
        tx.try_push(1).unwrap();
        let err = tx.try_push(2).unwrap_err();
        assert!(err.is_full());
        assert_eq!(err.into_inner(), 2);
        assert_eq!(rx.try_recv(), Ok(1));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_zero_capacity_try_push_always_full() {
        let (tx, _rx) = channel::<u32>(0);
        assert!(matches!(tx.try_push(1), Err(TryPushError::Full(1))));
    }

    #[tokio::test]
    async fn test_push_waits_for_room() {
        let (tx, mut rx) = channel(1);
        tx.push(1).await.unwrap();

        assert!(timeout(SHORT, tx.push(2)).await.is_err(), "push must block on a full queue");

        let writer = tokio::spawn(async move {
            tx.push(3).await.unwrap();
            tx
        });
        assert_eq!(rx.recv().await, Some(1));
        let _tx = writer.await.unwrap();
        assert_eq!(rx.recv().await, Some(3));
    }

    #[tokio::test]
    async fn test_rendezvous_completes_when_taken() {
        let (tx, mut rx) = channel(0);
        let writer = tokio::spawn(async move {
            tx.push(7).await.unwrap();
            tx
        });

        tokio::time::sleep(SHORT).await;
        assert!(!writer.is_finished(), "rendezvous push must wait for the reader");
        assert_eq!(rx.len(), 0);

        assert_eq!(rx.recv().await, Some(7));
        let _tx = writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_abandoned_rendezvous_is_retracted() {
        let (tx, mut rx) = channel(0);
        assert!(timeout(SHORT, tx.push(1)).await.is_err());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        // The slot is free again for the next push.
        let writer = tokio::spawn(async move {
            tx.push(2).await.unwrap();
            tx
        });
        assert_eq!(rx.recv().await, Some(2));
        let _tx = writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_drains() {
        let (mut tx, mut rx) = channel(2);
        tx.try_push(1).unwrap();
        assert!(tx.close());
        assert!(!tx.close());
        assert!(rx.is_closed());

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, None);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
        assert!(matches!(tx.try_push(2), Err(TryPushError::Closed(2))));
    }

    #[tokio::test]
    async fn test_close_wakes_parked_reader() {
        let (tx, mut rx) = channel::<u32>(1);
        let reader = tokio::spawn(async move {
            let got = rx.recv().await;
            got
        });
        tokio::time::sleep(SHORT).await;
        drop(tx);
        assert_eq!(reader.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_detached_push_fails_fast() {
        let (tx, rx) = channel(1);
        tx.try_push(1).unwrap();
        drop(rx);
        assert!(tx.is_detached());

        let res = timeout(SHORT, tx.push(2)).await.expect("push must not block");
        assert_eq!(res, Err(PushError::Detached));
    }

    #[tokio::test]
    async fn test_detach_releases_rendezvous_writer() {
        let (tx, rx) = channel(0);
        let writer = tokio::spawn(async move {
            let res = tx.push(9).await;
            res
        });
        tokio::time::sleep(SHORT).await;
        drop(rx);
        assert_eq!(writer.await.unwrap(), Err(PushError::Detached));
    }

    #[tokio::test]
    async fn test_into_stream_ends_on_close() {
        let (mut tx, rx) = channel(3);
        for i in 0..3 {
            tx.try_push(i).unwrap();
        }
        tx.close();
        let got: Vec<u32> = rx.into_stream().collect().await;
        assert_eq!(got, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_huge_capacity_is_clamped_not_allocated() {
        let (tx, mut rx) = channel::<u64>(usize::MAX / 2);
        assert_eq!(tx.capacity(), MAX_CAPACITY);
        assert_eq!(rx.capacity(), MAX_CAPACITY);

        for i in 0..1_000 {
            tx.try_push(i).unwrap();
        }
        assert_eq!(rx.len(), 1_000);
        assert_eq!(rx.recv().await, Some(0));
    }

    #[tokio::test]
    async fn test_closed_writer_rejects_push() {
        let (mut tx, _rx) = channel::<u32>(0);
        assert!(tx.close());
        assert!(tx.is_closed());
        assert_eq!(tx.push(1).await, Err(PushError::Closed));
    }

    #[test]
    fn test_ids_are_unique() {
        let (a, ra) = channel::<()>(1);
        let (b, rb) = channel::<()>(1);
        assert_ne!(a.id(), b.id());
        assert_eq!(SubscriberId::from(&ra), a.id());
        assert_eq!(rb.id(), b.id());
    }
}
