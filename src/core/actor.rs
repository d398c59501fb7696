//! # BroadcastActor: the loop behind a broadcaster.
//!
//! One actor owns one [`NoSyncRegistry`], one [`Source`] and the receiving end
//! of the command queue. It is the only code that touches the registry, so no
//! lock is needed.
//!
//! ## Architecture
//! ```text
//! Broadcaster ──Command──► mpsc ──┐
//!                                 ▼
//! loop {                  select! (biased)
//!   ├─► token cancelled   → stop(Cancelled)
//!   ├─► Subscribe         → registry.add_subscriber, ack
//!   ├─► Unsubscribe       → registry.unsubscribe, reply bool
//!   ├─► Len               → reply registry.len()
//!   └─► source.next()
//!         ├─ Some(v)      → registry.deliver(policy, token, v)
//!         └─ None         → stop(SourceClosed)
//! }
//!
//! stop: close command queue → close_all() → cancel token → mark stopped
//! ```
//!
//! ## Rules
//! - Cancellation **always wins** once observed, including during a `Wait` delivery
//! - Commands are served before source values when both are ready
//! - Every queue is closed exactly once, before `stopped` fires

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    policies::DeliveryPolicy,
    registry::{NoSyncRegistry, Registry},
};

use super::{command::Command, source::Source, stats::Counters};

/// Why the loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum StopReason {
    /// The broadcaster (or its parent token) was cancelled.
    Cancelled,
    /// The source returned `None`.
    SourceClosed,
}

impl StopReason {
    fn as_label(self) -> &'static str {
        match self {
            StopReason::Cancelled => "cancelled",
            StopReason::SourceClosed => "source_closed",
        }
    }
}

/// Everything the loop owns.
pub(super) struct BroadcastActor<T, S> {
    pub(super) source: S,
    pub(super) registry: NoSyncRegistry<T>,
    pub(super) commands: mpsc::Receiver<Command<T>>,
    pub(super) policy: DeliveryPolicy,
    pub(super) token: CancellationToken,
    pub(super) stopped: CancellationToken,
    pub(super) counters: Arc<Counters>,
}

impl<T, S> BroadcastActor<T, S>
where
    T: Clone + Send + 'static,
    S: Source<T>,
{
    /// Runs until cancellation or the end of the source.
    pub(super) async fn run(mut self) -> StopReason {
        tracing::info!(
            policy = %self.policy,
            capacity = self.registry.capacity(),
            "broadcast loop started"
        );

        let reason = loop {
            tokio::select! {
                biased;

                _ = self.token.cancelled() => break StopReason::Cancelled,

                Some(command) = self.commands.recv() => {
                    self.handle_command(command);
                }

                item = self.source.next() => match item {
                    Some(value) => self.broadcast(value).await,
                    None => break StopReason::SourceClosed,
                },
            }
        };

        self.stop(reason)
    }

    fn handle_command(&mut self, command: Command<T>) {
        match command {
            Command::Subscribe { writer, ack } => {
                let id = writer.id();
                self.registry.add_subscriber(writer);
                if ack.send(()).is_err() {
                    // Caller gave up before the ack; nobody holds the reader.
                    self.registry.unsubscribe(id);
                }
            }
            Command::Unsubscribe { id, reply } => {
                let _ = reply.send(self.registry.unsubscribe(id));
            }
            Command::Len { reply } => {
                let _ = reply.send(self.registry.len());
            }
        }
        self.counters.set_subscribers(self.registry.len());
    }

    async fn broadcast(&mut self, value: T) {
        self.counters.on_received();
        let delivery = self
            .registry
            .deliver(self.policy, &self.token, value)
            .await;

        if !delivery.is_complete() {
            tracing::trace!(?delivery, missed = delivery.missed(), "partial delivery");
        }
        self.counters.on_delivery(delivery);
        self.counters.set_subscribers(self.registry.len());
    }

    fn stop(mut self, reason: StopReason) -> StopReason {
        self.commands.close();
        // Pending requests fail with `Closed`; their queues close on drop.
        while self.commands.try_recv().is_ok() {}
        let closed = self.registry.close_all();
        self.counters.set_subscribers(0);

        self.token.cancel();
        self.stopped.cancel();

        tracing::info!(reason = reason.as_label(), closed, "broadcast loop stopped");
        reason
    }
}
