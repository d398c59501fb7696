//! Error types used by broadcasters and registries.
//!
//! This module defines two enums:
//!
//! - [`ConfigError`]: invalid construction parameters; no broadcaster is created.
//! - [`BroadcastError`]: a request reached a broadcaster that already stopped.
//!
//! Backpressure and cancellation are **not** errors: they are reported through
//! return values ([`Delivery`](crate::Delivery), counts, `bool`).
//! Queue-level errors live in [`queue`](crate::queue).

use thiserror::Error;

use crate::policies::DeliveryPolicy;

/// # Errors raised while validating a broadcaster configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A non-blocking policy was combined with zero-capacity queues.
    ///
    /// Non-blocking sends into a rendezvous queue can never succeed, so only
    /// [`DeliveryPolicy::Wait`] accepts capacity `0`.
    #[error("unbuffered subscriber queues are only allowed with the wait policy, not {policy}")]
    UnbufferedRequiresWait {
        /// The policy that was requested.
        policy: DeliveryPolicy,
    },

    /// The policy label or code is not recognized.
    #[error("unknown delivery policy: {value:?}")]
    UnknownPolicy {
        /// The rejected input.
        value: String,
    },

    /// The request queue into the broadcast loop must hold at least one request.
    #[error("command queue capacity must be at least 1")]
    ZeroCommandCapacity,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanout::{ConfigError, DeliveryPolicy};
    ///
    /// let err = ConfigError::UnbufferedRequiresWait { policy: DeliveryPolicy::Skip };
    /// assert_eq!(err.as_label(), "config_unbuffered_requires_wait");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::UnbufferedRequiresWait { .. } => "config_unbuffered_requires_wait",
            ConfigError::UnknownPolicy { .. } => "config_unknown_policy",
            ConfigError::ZeroCommandCapacity => "config_zero_command_capacity",
        }
    }
}

/// # Errors returned by [`Broadcaster`](crate::Broadcaster) requests.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// The broadcast loop has stopped (source ended or cancelled).
    #[error("broadcaster closed")]
    Closed,

    /// A per-subscriber capacity was rejected by the broadcaster's policy.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BroadcastError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BroadcastError::Closed => "broadcast_closed",
            BroadcastError::Config(e) => e.as_label(),
        }
    }
}
