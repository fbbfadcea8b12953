//! Controller metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters of one controller (all batches)
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Items delivered successfully
    sent_count: AtomicU64,
    /// Items failed (explicit failure or raised error)
    failure_count: AtomicU64,
    /// Subset of failures where the transport raised
    raised_count: AtomicU64,
    /// Batches that reached Completed
    completed_batches: AtomicU64,
    /// Batches that were cancelled
    cancelled_batches: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::Relaxed)
    }

    pub fn inc_sent_count(&self) {
        self.sent_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn raised_count(&self) -> u64 {
        self.raised_count.load(Ordering::Relaxed)
    }

    pub fn inc_raised_count(&self) {
        self.raised_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed_batches(&self) -> u64 {
        self.completed_batches.load(Ordering::Relaxed)
    }

    pub fn inc_completed_batches(&self) {
        self.completed_batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cancelled_batches(&self) -> u64 {
        self.cancelled_batches.load(Ordering::Relaxed)
    }

    pub fn inc_cancelled_batches(&self) {
        self.cancelled_batches.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sent_count: self.sent_count(),
            failure_count: self.failure_count(),
            raised_count: self.raised_count(),
            completed_batches: self.completed_batches(),
            cancelled_batches: self.cancelled_batches(),
        }
    }
}

/// Snapshot of controller metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub sent_count: u64,
    pub failure_count: u64,
    pub raised_count: u64,
    pub completed_batches: u64,
    pub cancelled_batches: u64,
}
