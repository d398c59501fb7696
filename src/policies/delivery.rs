//! # Delivery policies for full subscriber queues.
//!
//! [`DeliveryPolicy`] decides what a broadcaster does when a subscriber's
//! queue cannot take a value right now.
//!
//! - [`DeliveryPolicy::Wait`] block until the queue has room (or cancellation).
//! - [`DeliveryPolicy::Skip`] drop this value for that subscriber only.
//! - [`DeliveryPolicy::Unsubscribe`] close the queue and forget the subscriber.
//!
//! ## Choosing the right policy
//!
//! **Lossless, producer paced by the slowest subscriber**:
//! ```text
//! DeliveryPolicy::Wait          → every subscriber sees every value
//! ```
//!
//! **Latest-effort feeds (UI refresh, telemetry)**:
//! ```text
//! DeliveryPolicy::Skip          → slow subscribers miss values, stay subscribed
//! ```
//!
//! **Subscribers must keep up or reconnect**:
//! ```text
//! DeliveryPolicy::Unsubscribe   → first overflow closes the subscriber's queue
//! ```
//!
//! Only `Wait` works with zero-capacity (rendezvous) queues.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Policy applied when a subscriber's queue is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DeliveryPolicy {
    /// Skip the full subscriber for this value only (default).
    #[default]
    Skip,
    /// Wait for room; the only policy that supports capacity `0`.
    Wait,
    /// Close and remove the full subscriber.
    Unsubscribe,
}

impl DeliveryPolicy {
    /// All policies, in code order.
    pub const ALL: [DeliveryPolicy; 3] = [
        DeliveryPolicy::Skip,
        DeliveryPolicy::Wait,
        DeliveryPolicy::Unsubscribe,
    ];

    /// `true` if delivery may suspend on a slow subscriber.
    #[inline]
    pub fn is_blocking(self) -> bool {
        matches!(self, DeliveryPolicy::Wait)
    }

    /// Checks that queues of `capacity` can be served under this policy.
    ///
    /// # Example
    /// ```
    /// use fanout::DeliveryPolicy;
    ///
    /// assert!(DeliveryPolicy::Wait.check_capacity(0).is_ok());
    /// assert!(DeliveryPolicy::Skip.check_capacity(0).is_err());
    /// assert!(DeliveryPolicy::Unsubscribe.check_capacity(1).is_ok());
    /// ```
    pub fn check_capacity(self, capacity: usize) -> Result<(), ConfigError> {
        if capacity == 0 && !self.is_blocking() {
            return Err(ConfigError::UnbufferedRequiresWait { policy: self });
        }
        Ok(())
    }

    /// Returns a short stable label (lowercase) for use in logs/config.
    pub fn as_label(self) -> &'static str {
        match self {
            DeliveryPolicy::Skip => "skip",
            DeliveryPolicy::Wait => "wait",
            DeliveryPolicy::Unsubscribe => "unsubscribe",
        }
    }

    /// Stable numeric code (`0 = Skip`, `1 = Wait`, `2 = Unsubscribe`).
    pub fn code(self) -> u8 {
        match self {
            DeliveryPolicy::Skip => 0,
            DeliveryPolicy::Wait => 1,
            DeliveryPolicy::Unsubscribe => 2,
        }
    }
}

impl fmt::Display for DeliveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for DeliveryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryPolicy::ALL
            .into_iter()
            .find(|p| p.as_label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPolicy {
                value: s.to_string(),
            })
    }
}

impl TryFrom<u8> for DeliveryPolicy {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        DeliveryPolicy::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| ConfigError::UnknownPolicy {
                value: code.to_string(),
            })
    }
}

/// Outcome of delivering one value to every subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Every subscriber received the value (`Wait`).
    Delivered,
    /// Cancellation fired first; some subscribers may have missed the value (`Wait`).
    Cancelled,
    /// This many subscribers were full and missed the value (`Skip`).
    Skipped(usize),
    /// This many subscribers were full and got closed and removed (`Unsubscribe`).
    Evicted(usize),
}

impl Delivery {
    /// `true` if every subscriber present at delivery time got the value.
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            Delivery::Delivered | Delivery::Skipped(0) | Delivery::Evicted(0)
        )
    }

    /// Number of subscribers that missed the value because of backpressure.
    pub fn missed(self) -> usize {
        match self {
            Delivery::Skipped(n) | Delivery::Evicted(n) => n,
            Delivery::Delivered | Delivery::Cancelled => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_wait_accepts_zero_capacity() {
        assert!(DeliveryPolicy::Wait.check_capacity(0).is_ok());
        assert_eq!(
            DeliveryPolicy::Skip.check_capacity(0),
            Err(ConfigError::UnbufferedRequiresWait {
                policy: DeliveryPolicy::Skip
            })
        );
        assert_eq!(
            DeliveryPolicy::Unsubscribe.check_capacity(0),
            Err(ConfigError::UnbufferedRequiresWait {
                policy: DeliveryPolicy::Unsubscribe
            })
        );
        for policy in DeliveryPolicy::ALL {
            assert!(policy.check_capacity(1).is_ok(), "{policy} with capacity 1");
        }
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("wait".parse::<DeliveryPolicy>(), Ok(DeliveryPolicy::Wait));
        assert_eq!(" Skip ".parse::<DeliveryPolicy>(), Ok(DeliveryPolicy::Skip));
        assert_eq!(
            "UNSUBSCRIBE".parse::<DeliveryPolicy>(),
            Ok(DeliveryPolicy::Unsubscribe)
        );
        let err = "drop-oldest".parse::<DeliveryPolicy>().unwrap_err();
        assert_eq!(err.as_label(), "config_unknown_policy");
    }

    #[test]
    fn test_codes_roundtrip_and_reject_unknown() {
        for policy in DeliveryPolicy::ALL {
            assert_eq!(DeliveryPolicy::try_from(policy.code()), Ok(policy));
        }
        assert!(matches!(
            DeliveryPolicy::try_from(3),
            Err(ConfigError::UnknownPolicy { .. })
        ));
    }

    #[test]
    fn test_delivery_completeness() {
        assert!(Delivery::Delivered.is_complete());
        assert!(Delivery::Skipped(0).is_complete());
        assert!(!Delivery::Skipped(2).is_complete());
        assert!(!Delivery::Evicted(1).is_complete());
        assert!(!Delivery::Cancelled.is_complete());
        assert_eq!(Delivery::Evicted(3).missed(), 3);
    }
}
