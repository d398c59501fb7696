//! # Broadcaster: handle to a running broadcast loop.
//!
//! A [`Broadcaster`] is created over a [`Source`]. Construction spawns a loop
//! that owns the subscribers and forwards every source value to each of them
//! according to the configured [`DeliveryPolicy`].
//!
//! ## Lifecycle
//! ```text
//! new/best_effort/synchronous ──► spawn BroadcastActor::run()
//!        │
//!        ├─► subscribe()/unsubscribe()/len()   round trip through the loop
//!        │
//!        ├─► source ends ─────┐
//!        ├─► close() ─────────┤
//!        └─► parent token ────┴─► close every subscriber ─► stopped()
//! ```
//!
//! ## Rules
//! - Handles are cheap to clone; all clones drive the same loop.
//! - Dropping every handle does **not** stop the loop.
//! - Requests to a stopped loop fail with [`BroadcastError::Closed`] (or return
//!   `false`/`0`); they never hang.
//!
//! ## Example
//! ```
//! use fanout::Broadcaster;
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), fanout::BroadcastError> {
//! let token = CancellationToken::new();
//! let (tx, rx) = mpsc::channel(16);
//! let broadcaster = Broadcaster::best_effort(&token, rx);
//!
//! let mut a = broadcaster.subscribe().await?;
//! let mut b = broadcaster.subscribe().await?;
//! tx.send("hello").await.unwrap();
//!
//! assert_eq!(a.recv().await, Some("hello"));
//! assert_eq!(b.recv().await, Some("hello"));
//!
//! drop(tx);
//! broadcaster.stopped().await;
//! assert_eq!(a.recv().await, None);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{
    config::BroadcasterConfig,
    error::{BroadcastError, ConfigError},
    policies::DeliveryPolicy,
    queue::{self, SubscriberId, Subscription},
    registry::NoSyncRegistry,
};

use super::{
    actor::BroadcastActor,
    command::Command,
    source::Source,
    stats::{BroadcastStats, Counters},
};

/// Handle to a broadcast loop.
pub struct Broadcaster<T> {
    commands: mpsc::Sender<Command<T>>,
    token: CancellationToken,
    stopped: CancellationToken,
    config: BroadcasterConfig,
    counters: Arc<Counters>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            token: self.token.clone(),
            stopped: self.stopped.clone(),
            config: self.config.clone(),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<T> Broadcaster<T>
where
    T: Clone + Send + 'static,
{
    /// Validates `config` and spawns the loop.
    ///
    /// The loop runs until `source` ends or `token` (or this broadcaster, see
    /// [`close`](Self::close)) is cancelled. Must be called inside a tokio runtime.
    pub fn new<S>(
        token: &CancellationToken,
        source: S,
        config: BroadcasterConfig,
    ) -> Result<Self, ConfigError>
    where
        S: Source<T>,
    {
        config.validate()?;
        Ok(Self::spawn(token, source, config))
    }

    /// Skips slow subscribers; queues are as deep as the source's buffer (min 1).
    pub fn best_effort<S>(token: &CancellationToken, source: S) -> Self
    where
        S: Source<T>,
    {
        let config = BroadcasterConfig::best_effort(source.capacity());
        Self::spawn(token, source, config)
    }

    /// Hands every value to every subscriber in person (capacity 0, `Wait`).
    ///
    /// The source is paced by the slowest subscriber.
    pub fn synchronous<S>(token: &CancellationToken, source: S) -> Self
    where
        S: Source<T>,
    {
        Self::spawn(token, source, BroadcasterConfig::synchronous())
    }

    fn spawn<S>(parent: &CancellationToken, source: S, config: BroadcasterConfig) -> Self
    where
        S: Source<T>,
    {
        let (tx, rx) = mpsc::channel(config.command_capacity);
        let token = parent.child_token();
        let stopped = CancellationToken::new();
        let counters = Arc::new(Counters::default());

        let actor = BroadcastActor {
            source,
            registry: NoSyncRegistry::new(config.capacity),
            commands: rx,
            policy: config.policy,
            token: token.clone(),
            stopped: stopped.clone(),
            counters: Arc::clone(&counters),
        };
        tokio::spawn(actor.run());

        Self {
            commands: tx,
            token,
            stopped,
            config,
            counters,
        }
    }

    /// Registers a new subscriber with the configured capacity.
    ///
    /// Returns once the loop registered it: every value the loop takes from
    /// the source afterwards reaches the subscription.
    pub async fn subscribe(&self) -> Result<Subscription<T>, BroadcastError> {
        self.subscribe_with_capacity(self.config.capacity).await
    }

    /// Registers a new subscriber with its own capacity.
    ///
    /// Capacity `0` is rejected unless the policy is [`DeliveryPolicy::Wait`].
    pub async fn subscribe_with_capacity(
        &self,
        capacity: usize,
    ) -> Result<Subscription<T>, BroadcastError> {
        self.config.policy.check_capacity(capacity)?;

        let (writer, subscription) = queue::channel(capacity);
        let (ack, acked) = oneshot::channel();
        self.request(Command::Subscribe { writer, ack }, acked).await?;
        Ok(subscription)
    }

    /// Removes and closes a subscriber.
    ///
    /// Returns `false` if it was not registered (already removed, evicted,
    /// or the loop stopped).
    pub async fn unsubscribe(&self, id: impl Into<SubscriberId>) -> bool {
        let (reply, rx) = oneshot::channel();
        let id = id.into();
        self.request(Command::Unsubscribe { id, reply }, rx)
            .await
            .unwrap_or(false)
    }

    /// Number of live subscribers (`0` once stopped).
    pub async fn len(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Len { reply }, rx).await.unwrap_or(0)
    }

    /// `true` if no subscriber is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn request<R>(
        &self,
        command: Command<T>,
        reply: oneshot::Receiver<R>,
    ) -> Result<R, BroadcastError> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(BroadcastError::Closed),
            sent = self.commands.send(command) => {
                sent.map_err(|_| BroadcastError::Closed)?;
            }
        }
        reply.await.map_err(|_| BroadcastError::Closed)
    }
}

impl<T> Broadcaster<T> {
    /// Stops this broadcaster; the parent token is not affected.
    ///
    /// Every subscriber is closed shortly after. Await [`stopped`](Self::stopped)
    /// to know when.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// `true` once the loop was asked to stop or has stopped.
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves after the loop exited and closed every subscriber.
    pub async fn stopped(&self) {
        self.stopped.cancelled().await;
    }

    /// Snapshot of the loop's counters.
    pub fn stats(&self) -> BroadcastStats {
        self.counters.snapshot()
    }

    /// Delivery policy of this broadcaster.
    pub fn policy(&self) -> DeliveryPolicy {
        self.config.policy
    }

    /// Capacity of queues created by [`subscribe`](Self::subscribe).
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Configuration the loop was started with.
    pub fn config(&self) -> &BroadcasterConfig {
        &self.config
    }
}

impl<T> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("policy", &self.config.policy)
            .field("capacity", &self.config.capacity)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
