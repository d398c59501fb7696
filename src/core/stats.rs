use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::policies::Delivery;

/// Point-in-time counters of one broadcaster.
///
/// - `received`: values taken from the source
/// - `delivered`: fan-out rounds that ran to completion
/// - `cancelled`: rounds interrupted by cancellation (`Wait` only)
/// - `skipped`: per-subscriber values dropped by `Skip`
/// - `evicted`: subscribers removed by `Unsubscribe`
/// - `subscribers`: live subscribers after the last loop step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BroadcastStats {
    pub received: u64,
    pub delivered: u64,
    pub cancelled: u64,
    pub skipped: u64,
    pub evicted: u64,
    pub subscribers: usize,
}

/// Written by the loop, read by any handle.
#[derive(Default)]
pub(super) struct Counters {
    received: AtomicU64,
    delivered: AtomicU64,
    cancelled: AtomicU64,
    skipped: AtomicU64,
    evicted: AtomicU64,
    subscribers: AtomicUsize,
}

impl Counters {
    pub(super) fn on_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn on_delivery(&self, delivery: Delivery) {
        match delivery {
            Delivery::Cancelled => {
                self.cancelled.fetch_add(1, Ordering::Relaxed);
                return;
            }
            Delivery::Skipped(n) => {
                self.skipped.fetch_add(n as u64, Ordering::Relaxed);
            }
            Delivery::Evicted(n) => {
                self.evicted.fetch_add(n as u64, Ordering::Relaxed);
            }
            Delivery::Delivered => {}
        }
        self.delivered.fetch_add(1, Ordering::Release);
    }

    pub(super) fn set_subscribers(&self, n: usize) {
        self.subscribers.store(n, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self) -> BroadcastStats {
        let delivered = self.delivered.load(Ordering::Acquire);
        BroadcastStats {
            received: self.received.load(Ordering::Relaxed),
            delivered,
            cancelled: self.cancelled.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            subscribers: self.subscribers.load(Ordering::Relaxed),
        }
    }
}
