//! Store statistics.
//!
//! `add` never reports failures to its caller, so these counters are how an
//! application notices dropped writes or rotations that keep failing.
//!
//! # Usage
//!
//! ```rust
//! # use jsonlog_core::LogStore;
//! # use serde_json::json;
//! # let dir = tempfile::tempdir()?;
//! let store = LogStore::open(dir.path().join("app.log"))?;
//! store.add(&json!({"event": "boot"}));
//!
//! let stats = store.stats().snapshot();
//! println!("records: {}", stats.records_appended);
//! println!("dropped batches: {}", stats.append_failures);
//! # assert_eq!(stats.records_appended, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single [`LogStore`](crate::LogStore).
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// Batches appended to the active file.
    batches_appended: AtomicU64,
    /// Records appended to the active file.
    records_appended: AtomicU64,
    /// Bytes appended to the active file.
    bytes_written: AtomicU64,
    /// Batches that failed to encode or append.
    append_failures: AtomicU64,
    /// Successful rotations.
    rotations: AtomicU64,
    /// Rotation attempts that failed at some step.
    rotation_failures: AtomicU64,
    /// Archived segments deleted by retention.
    segments_pruned: AtomicU64,
    /// Archived segments retention failed to delete.
    prune_failures: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_append(&self, records: u64, bytes: u64) {
        self.batches_appended.fetch_add(1, Ordering::Relaxed);
        self.records_appended.fetch_add(records, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_append_failure(&self) {
        self.append_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rotation(&self, pruned: u64, prune_failures: u64) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
        self.segments_pruned.fetch_add(pruned, Ordering::Relaxed);
        self.prune_failures
            .fetch_add(prune_failures, Ordering::Relaxed);
    }

    pub(crate) fn record_rotation_failure(&self) {
        self.rotation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of batches appended.
    pub fn batches_appended(&self) -> u64 {
        self.batches_appended.load(Ordering::Relaxed)
    }

    /// Returns the number of records appended.
    pub fn records_appended(&self) -> u64 {
        self.records_appended.load(Ordering::Relaxed)
    }

    /// Returns the number of bytes appended.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Returns the number of batches that were dropped.
    pub fn append_failures(&self) -> u64 {
        self.append_failures.load(Ordering::Relaxed)
    }

    /// Returns the number of completed rotations.
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    /// Returns the number of failed rotation attempts.
    pub fn rotation_failures(&self) -> u64 {
        self.rotation_failures.load(Ordering::Relaxed)
    }

    /// Returns the number of archived segments deleted by retention.
    pub fn segments_pruned(&self) -> u64 {
        self.segments_pruned.load(Ordering::Relaxed)
    }

    /// Returns the number of archived segments retention could not delete.
    pub fn prune_failures(&self) -> u64 {
        self.prune_failures.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            batches_appended: self.batches_appended(),
            records_appended: self.records_appended(),
            bytes_written: self.bytes_written(),
            append_failures: self.append_failures(),
            rotations: self.rotations(),
            rotation_failures: self.rotation_failures(),
            segments_pruned: self.segments_pruned(),
            prune_failures: self.prune_failures(),
        }
    }
}

/// A point-in-time copy of [`StoreStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Batches appended to the active file.
    pub batches_appended: u64,
    /// Records appended to the active file.
    pub records_appended: u64,
    /// Bytes appended to the active file.
    pub bytes_written: u64,
    /// Batches that failed to encode or append.
    pub append_failures: u64,
    /// Successful rotations.
    pub rotations: u64,
    /// Failed rotation attempts.
    pub rotation_failures: u64,
    /// Archived segments deleted by retention.
    pub segments_pruned: u64,
    /// Archived segments retention failed to delete.
    pub prune_failures: u64,
}
