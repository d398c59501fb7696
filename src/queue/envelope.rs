use tokio::sync::oneshot;

/// One value in flight through a subscriber queue.
///
/// Rendezvous pushes attach an `ack`; the value counts as taken only if the
/// ack reaches the writer. A writer that gave up has dropped the other end,
/// so the reader discards the value instead of observing it.
pub(super) struct Envelope<T> {
    value: T,
    ack: Option<oneshot::Sender<()>>,
}

impl<T> Envelope<T> {
    pub(super) fn buffered(value: T) -> Self {
        Self { value, ack: None }
    }

    pub(super) fn handoff(value: T, ack: oneshot::Sender<()>) -> Self {
        Self {
            value,
            ack: Some(ack),
        }
    }

    pub(super) fn into_value(self) -> T {
        self.value
    }

    /// Takes the value, or `None` if its rendezvous writer is gone.
    pub(super) fn accept(self) -> Option<T> {
        match self.ack {
            None => Some(self.value),
            Some(ack) => ack.send(()).ok().map(|()| self.value),
        }
    }
}
