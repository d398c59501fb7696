//! Broadcast core: the loop and its handle.
//!
//! The only public API from this module is [`Broadcaster`] (plus the
//! [`Source`] input trait and [`BroadcastStats`]).
//!
//! Internal modules:
//! - [`broadcaster`]: handle; construction, subscribe/unsubscribe round trips, shutdown;
//! - [`actor`]: the loop owning the registry, the source and the command queue;
//! - [`command`]: requests from handles to the loop;
//! - [`source`]: input trait and its implementations;
//! - [`stats`]: counters maintained by the loop.

mod actor;
mod broadcaster;
mod command;
mod source;
mod stats;

pub use broadcaster::Broadcaster;
pub use source::{Source, StreamSource};
pub use stats::BroadcastStats;
