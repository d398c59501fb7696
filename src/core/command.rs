use tokio::sync::oneshot;

use crate::queue::{QueueWriter, SubscriberId};

/// Request from a [`Broadcaster`](super::Broadcaster) handle to its loop.
///
/// Every variant carries a reply channel; the handle returns only after the
/// loop answered (or dropped the request on shutdown).
pub(super) enum Command<T> {
    /// Register a queue the caller created.
    Subscribe {
        writer: QueueWriter<T>,
        ack: oneshot::Sender<()>,
    },
    /// Remove and close a queue; replies with whether it was registered.
    Unsubscribe {
        id: SubscriberId,
        reply: oneshot::Sender<bool>,
    },
    /// Current number of subscribers.
    Len { reply: oneshot::Sender<usize> },
}
