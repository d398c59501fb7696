//! # Subscriber registries.
//!
//! A registry owns the writing ends of subscriber queues and fans each value
//! out to all of them.
//!
//! - [`NoSyncRegistry`] no locking; the owner serializes access (used by the broadcast loop).
//! - [`SyncRegistry`] `Arc<RwLock<..>>` around the former; cloneable and shareable.
//! - [`Registry`] the capability set both provide, plus policy dispatch via [`Registry::deliver`].
//!
//! ## Send operations
//! ```text
//! send_or_wait(token, v)    → park on full queues; false once token fires
//! send_or_skip(v)           → skip full queues;    returns #skipped
//! send_or_unsubscribe(v)    → evict full queues;   returns #evicted
//! ```
//!
//! Queues whose [`Subscription`](crate::Subscription) was dropped are pruned
//! during sends and never block them.

mod contract;
mod nosync;
mod sync;

pub use contract::Registry;
pub use nosync::NoSyncRegistry;
pub use sync::SyncRegistry;
