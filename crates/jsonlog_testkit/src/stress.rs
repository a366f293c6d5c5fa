//! Stress tests for jsonlog stores.
//!
//! These tests verify behavior under heavy load and concurrent access,
//! with rotation and retention running throughout.

use jsonlog_core::LogStore;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {name} ===");
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent threads (for concurrent tests).
    pub threads: usize,
    /// Size of each record's payload string in bytes.
    pub payload_size: usize,
    /// Records per batch (for batch tests).
    pub batch_size: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            payload_size: 128,
            batch_size: 50,
        }
    }
}

/// Run a sequential append stress test.
pub fn stress_sequential_appends(store: &LogStore, config: &StressConfig) -> StressTestResult {
    let payload = "x".repeat(config.payload_size);

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        match store.try_add(&json!({"seq": i, "payload": payload})) {
            Ok(_) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a batched append stress test. Counts records, not calls.
pub fn stress_batch_appends(store: &LogStore, config: &StressConfig) -> StressTestResult {
    let payload = "x".repeat(config.payload_size);
    let batch_size = config.batch_size.max(1);

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for batch in 0..(config.operations / batch_size) {
        let records: Vec<_> = (0..batch_size)
            .map(|i| json!({"seq": batch * batch_size + i, "payload": payload}))
            .collect();

        match store.try_add(&records) {
            Ok(written) => successful += written,
            Err(_) => failed += batch_size,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a tail-read stress test over a populated store.
///
/// A read counts as failed if it returns fewer records than asked for.
pub fn stress_tail_reads(store: &LogStore, config: &StressConfig) -> StressTestResult {
    let payload = "x".repeat(config.payload_size);
    for i in 0..config.batch_size {
        let _ = store.try_add(&json!({"seq": i, "payload": payload}));
    }

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let n = i % config.batch_size.max(1) + 1;
        if store.last(n).len() == n {
            successful += 1;
        } else {
            failed += 1;
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run concurrent appends from several threads against one store.
pub fn stress_concurrent_appends(store: Arc<LogStore>, config: &StressConfig) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_thread = config.operations / config.threads;
    let payload = Arc::new("x".repeat(config.payload_size));

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let payload = Arc::clone(&payload);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    match store.try_add(&json!({"thread": t, "seq": i, "payload": *payload})) {
                        Ok(_) => {
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run appends and tail reads concurrently. Half the threads write, the
/// other half read.
pub fn stress_mixed_operations(store: Arc<LogStore>, config: &StressConfig) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let threads = config.threads.max(2);
    let ops_per_thread = config.operations / threads;

    let start = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let ok = if t % 2 == 0 {
                        store.try_add(&json!({"thread": t, "seq": i})).is_ok()
                    } else {
                        let n = i % 10 + 1;
                        let records = store.last(n);
                        records.len() <= n && records.iter().all(|r| r.contains_key("seq"))
                    };

                    let counter = if ok { &successful } else { &failed };
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}
