//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for one controller
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Commands that changed state
    commands_processed: AtomicU64,
    /// Commands rejected by validation
    commands_rejected: AtomicU64,
    /// Views delivered to subscribers
    views_emitted: AtomicU64,
    /// Successful collection loads
    collections_loaded: AtomicU64,
    /// Deliveries to closed subscribers
    deliveries_failed: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_commands_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_commands_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_views_emitted(&self) {
        self.views_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_collections_loaded(&self) {
        self.collections_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_deliveries_failed(&self, count: u64) {
        self.deliveries_failed.fetch_add(count, Ordering::Relaxed);
    }

    /// Current counters as a JSON object string
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"collections_loaded":{},"commands_processed":{},"commands_rejected":{},"deliveries_failed":{},"views_emitted":{}}}"#,
            s.collections_loaded,
            s.commands_processed,
            s.commands_rejected,
            s.deliveries_failed,
            s.views_emitted,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_processed: self.commands_processed.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            views_emitted: self.views_emitted.load(Ordering::Relaxed),
            collections_loaded: self.collections_loaded.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub commands_processed: u64,
    pub commands_rejected: u64,
    pub views_emitted: u64,
    pub collections_loaded: u64,
    pub deliveries_failed: u64,
}
