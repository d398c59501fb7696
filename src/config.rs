//! # Broadcaster configuration.
//!
//! [`BroadcasterConfig`] defines a broadcaster's behavior: per-subscriber
//! queue capacity, delivery policy, and the depth of the request queue into
//! the broadcast loop.
//!
//! ## Presets
//! - [`BroadcasterConfig::best_effort`] → capacity `n` (min 1), `Skip`
//! - [`BroadcasterConfig::synchronous`] → capacity `0`, `Wait`
//!
//! ## Sentinel values
//! - `capacity = 0` → rendezvous queues; valid only with [`DeliveryPolicy::Wait`]
//!
//! # Example
//! ```
//! use fanout::{BroadcasterConfig, DeliveryPolicy};
//!
//! let cfg = BroadcasterConfig::default()
//!     .capacity(10)
//!     .policy(DeliveryPolicy::Unsubscribe);
//! assert!(cfg.validate().is_ok());
//!
//! let bad = BroadcasterConfig::default().capacity(0);
//! assert!(bad.validate().is_err());
//! ```

use crate::error::ConfigError;
use crate::policies::DeliveryPolicy;

/// Default depth of the subscribe/unsubscribe request queue.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Configuration of one broadcaster.
///
/// ## Field semantics
/// - `capacity`: per-subscriber queue capacity (`0` = rendezvous, `Wait` only)
/// - `policy`: what to do with a full subscriber queue
/// - `command_capacity`: pending subscribe/unsubscribe requests before callers wait (min 1)
///
/// All fields are public; [`validate`](Self::validate) is applied by every
/// constructor before anything is spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcasterConfig {
    /// Capacity of each subscriber queue created by `subscribe()`.
    pub capacity: usize,

    /// Policy applied when a subscriber queue is full.
    pub policy: DeliveryPolicy,

    /// Capacity of the request queue into the broadcast loop.
    pub command_capacity: usize,
}

impl Default for BroadcasterConfig {
    /// Default configuration:
    ///
    /// - `capacity = 1`
    /// - `policy = DeliveryPolicy::Skip`
    /// - `command_capacity = 64`
    fn default() -> Self {
        Self {
            capacity: 1,
            policy: DeliveryPolicy::default(),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
        }
    }
}

impl BroadcasterConfig {
    /// Best-effort preset: skip slow subscribers, `capacity` clamped to at least 1.
    pub fn best_effort(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            policy: DeliveryPolicy::Skip,
            ..Default::default()
        }
    }

    /// Synchronous preset: rendezvous queues, every value handed over in person.
    pub fn synchronous() -> Self {
        Self {
            capacity: 0,
            policy: DeliveryPolicy::Wait,
            ..Default::default()
        }
    }

    /// Set the per-subscriber capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the delivery policy.
    pub fn policy(mut self, policy: DeliveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the request queue capacity.
    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    /// Checks the capacity/policy combination and the request queue size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.check_capacity(self.capacity)?;
        if self.command_capacity == 0 {
            return Err(ConfigError::ZeroCommandCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = BroadcasterConfig::default();

        assert_eq!(cfg.capacity, 1);
        assert_eq!(cfg.policy, DeliveryPolicy::Skip);
        assert_eq!(cfg.command_capacity, DEFAULT_COMMAND_CAPACITY);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_best_effort_clamps_capacity() {
        let cfg = BroadcasterConfig::best_effort(0);

        assert_eq!(cfg.capacity, 1);
        assert_eq!(cfg.policy, DeliveryPolicy::Skip);
        assert_eq!(BroadcasterConfig::best_effort(8).capacity, 8);
    }

    #[test]
    fn test_synchronous_is_valid() {
        let cfg = BroadcasterConfig::synchronous();

        assert_eq!(cfg.capacity, 0);
        assert_eq!(cfg.policy, DeliveryPolicy::Wait);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_unbuffered_non_wait() {
        for policy in [DeliveryPolicy::Skip, DeliveryPolicy::Unsubscribe] {
            let cfg = BroadcasterConfig::default().capacity(0).policy(policy);
            assert_eq!(
                cfg.validate(),
                Err(ConfigError::UnbufferedRequiresWait { policy })
            );
        }
    }

    #[test]
    fn test_rejects_zero_command_capacity() {
        let cfg = BroadcasterConfig::default().command_capacity(0);

        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCommandCapacity));
    }

    #[test]
    fn test_builder_chaining() {
        let cfg = BroadcasterConfig::default()
            .capacity(10)
            .policy(DeliveryPolicy::Wait)
            .command_capacity(8);

        assert_eq!(cfg.capacity, 10);
        assert_eq!(cfg.policy, DeliveryPolicy::Wait);
        assert_eq!(cfg.command_capacity, 8);
    }
}
