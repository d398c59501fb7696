//! Delivery policies.
//!
//! This module groups the knobs that control **what happens** when a
//! subscriber's queue is full.
//!
//! ## Contents
//! - [`DeliveryPolicy`] wait / skip / unsubscribe
//! - [`Delivery`]       report of one fan-out round
//!
//! ## Quick wiring
//! ```text
//! BroadcasterConfig { capacity, policy: DeliveryPolicy }
//!      └─► core::actor::BroadcastActor uses:
//!           - policy.check_capacity(capacity) at construction
//!           - Registry::deliver(policy, ..) for every source value
//! ```
//!
//! ## Defaults
//! - `DeliveryPolicy::Skip` (best effort; never stalls the producer).

mod delivery;

pub use delivery::{Delivery, DeliveryPolicy};
