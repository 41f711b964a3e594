use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Delivery counters shared between `submit` callers and the worker.
#[derive(Debug, Default)]
pub struct DispatchStats {
    enqueued: AtomicU64,
    rejected: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Submissions accepted into the queue
    pub enqueued: u64,
    /// Submissions refused (empty message or no active worker)
    pub rejected: u64,
    /// Webhook calls answered with 200
    pub delivered: u64,
    /// Webhook calls that failed for any reason
    pub failed: u64,
    /// Messages dropped by the channel or type filters
    pub skipped: u64,
    /// Messages currently waiting for the worker
    pub queue_depth: usize,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, queue_depth: usize) -> StatsSnapshot {
        StatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            queue_depth,
        }
    }
}
