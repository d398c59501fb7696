//! # fanout
//!
//! **fanout** is a single-producer, multi-consumer broadcaster for tokio.
//!
//! One [`Source`] feeds one broadcast loop; every value taken from the source
//! is copied into a private bounded queue per subscriber. What happens when a
//! subscriber's queue is full is decided by a [`DeliveryPolicy`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌───────────────────────┐
//!     │ Source (mpsc, Stream) │
//!     └───────────┬───────────┘
//!                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  BroadcastActor (one tokio task per broadcaster)                  │
//! │  - NoSyncRegistry (owned, no locks)                               │
//! │  - DeliveryPolicy (Wait / Skip / Unsubscribe)                     │
//! │  - command queue  (Subscribe / Unsubscribe / Len)                 │
//! └──────┬──────────────────┬──────────────────┬──────────────▲──────┘
//!        ▼                  ▼                  ▼              │
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐        │
//!   │ queue 1  │       │ queue 2  │       │ queue N  │        │
//!   │ (cap C)  │       │ (cap C)  │       │ (cap C)  │   Broadcaster
//!   └────┬─────┘       └────┬─────┘       └────┬─────┘   handles
//!        ▼                  ▼                  ▼        (subscribe,
//!   Subscription       Subscription       Subscription   close, ...)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Broadcaster::new ──► spawn loop
//!
//! loop {
//!   ├─► cancelled?        ─► exit
//!   ├─► command?          ─► register / remove / count
//!   └─► source value?
//!         ├─ Some(v) ─► deliver v to every queue per policy
//!         └─ None    ─► exit
//! }
//!
//! On exit: close every queue ─► stopped() resolves
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------|---------------------------------------------|
//! | **Broadcaster**   | Actor-owned fan-out with request/acknowledge subscribing. | [`Broadcaster`], [`Source`], [`StreamSource`] |
//! | **Registries**    | Fan-out without a task, unsynchronized or lock-guarded.   | [`NoSyncRegistry`], [`SyncRegistry`], [`Registry`] |
//! | **Queues**        | Bounded per-subscriber FIFOs, including rendezvous.       | [`queue::channel`], [`Subscription`]        |
//! | **Policies**      | Wait, skip or evict slow subscribers.                     | [`DeliveryPolicy`], [`Delivery`]            |
//! | **Errors**        | Typed construction and request errors.                    | [`ConfigError`], [`BroadcastError`]         |
//! | **Configuration** | Capacity, policy and request queue depth.                 | [`BroadcasterConfig`]                       |
//!
//! ## Example
//! ```rust
//! use fanout::{Broadcaster, BroadcasterConfig, DeliveryPolicy};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = CancellationToken::new();
//!     let (tx, rx) = mpsc::channel(8);
//!
//!     // Lossless: the producer is paced by the slowest subscriber.
//!     let cfg = BroadcasterConfig::default()
//!         .capacity(4)
//!         .policy(DeliveryPolicy::Wait);
//!     let broadcaster = Broadcaster::new(&token, rx, cfg)?;
//!
//!     let mut sub = broadcaster.subscribe().await?;
//!     for i in 0..3 {
//!         tx.send(i).await?;
//!     }
//!     drop(tx);
//!
//!     while let Some(v) = sub.recv().await {
//!         println!("got {v}");
//!     }
//!     broadcaster.stopped().await;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod policies;
pub mod queue;
mod registry;

// ---- Public re-exports ----

pub use config::{BroadcasterConfig, DEFAULT_COMMAND_CAPACITY};
pub use core::{BroadcastStats, Broadcaster, Source, StreamSource};
pub use error::{BroadcastError, ConfigError};
pub use policies::{Delivery, DeliveryPolicy};
pub use queue::{SubscriberId, Subscription};
pub use registry::{NoSyncRegistry, Registry, SyncRegistry};
