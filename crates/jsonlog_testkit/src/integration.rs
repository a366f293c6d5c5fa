//! Cross-crate integration test helpers.
//!
//! Provides utilities for testing the store together with the codec and
//! storage crates beneath it.

use jsonlog_codec::{decode_line, encode_batch, Record};
use jsonlog_core::{tail_lines, LogStore};
use jsonlog_storage::{FileBackend, StorageBackend};
use serde_json::Value;
use std::path::Path;

/// A test harness that mirrors every append in memory.
///
/// The store must be opened without timestamps and without rotation, so
/// the active file holds exactly what was added.
pub struct IntegrationHarness {
    /// The store under test.
    pub store: LogStore,
    /// Records added so far, in order.
    records: Vec<Value>,
}

impl IntegrationHarness {
    /// Wraps `store`.
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            records: Vec::new(),
        }
    }

    /// Adds `entry` and tracks the records it contains.
    pub fn add(&mut self, entry: Value) {
        self.store.try_add(&entry).expect("Failed to add entry");
        match entry {
            Value::Array(records) => self.records.extend(records),
            record => self.records.push(record),
        }
    }

    /// Reads the last `n` records and checks them against the tracked ones.
    pub fn last_and_verify(&self, n: usize) -> Vec<Record> {
        let actual = self.store.last(n);
        let expected = &self.records[self.records.len().saturating_sub(n)..];

        assert_eq!(actual.len(), expected.len(), "Tail length mismatch");
        for (actual, expected) in actual.iter().zip(expected) {
            assert_eq!(
                &Value::Object(actual.clone()),
                expected,
                "Tail record mismatch"
            );
        }

        actual
    }

    /// Verifies that the active file holds every tracked record, in order.
    pub fn verify_all(&self) {
        let raw = self.store.read_raw().expect("Failed to read raw");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), self.records.len(), "Line count mismatch");

        for (line, expected) in lines.iter().zip(&self.records) {
            let actual = decode_line(line.as_bytes()).expect("Failed to decode line");
            assert_eq!(&Value::Object(actual), expected, "Record mismatch");
        }
    }

    /// Clears the store and forgets the tracked records.
    pub fn clear(&mut self) {
        self.store.clear().expect("Failed to clear");
        self.records.clear();
    }

    /// Returns the count of tracked records.
    pub fn tracked_count(&self) -> usize {
        self.records.len()
    }
}

/// Test codec/storage integration.
pub mod codec_storage {
    use super::*;

    /// Verifies that encoded records stored in `backend` come back from a
    /// tail read unchanged.
    pub fn test_encode_store_tail(backend: &mut dyn StorageBackend, records: &[Record]) {
        let encoded = encode_batch(records).expect("Failed to encode");
        backend.append(&encoded).expect("Failed to append");
        backend.flush().expect("Failed to flush");

        let lines = tail_lines(&*backend, records.len()).expect("Failed to tail");
        assert_eq!(lines.len(), records.len(), "Tail length mismatch");

        for (line, expected) in lines.iter().zip(records) {
            let decoded = decode_line(line).expect("Failed to decode");
            assert_eq!(&decoded, expected, "Decoded record mismatch");
        }
    }

    /// Tests that the storage backend properly persists data.
    pub fn test_storage_persistence(backend: &mut dyn StorageBackend, data: &[u8]) {
        let offset = backend.append(data).expect("Failed to append");
        backend.flush().expect("Failed to flush");

        let retrieved = backend
            .read_at(offset, data.len())
            .expect("Failed to read");
        assert_eq!(data, &retrieved[..], "Retrieved data should match");
    }
}

/// Test rotation and retention integration.
pub mod rotation {
    use super::*;
    use crate::fixtures::log_files;
    use serde_json::json;

    /// Appends until the store has rotated `rotations` times, checking after
    /// every append that at most `max_file_count` files exist.
    pub fn test_retention_cap(
        store: &LogStore,
        dir: &Path,
        prefix: &str,
        extension: &str,
        rotations: u64,
    ) {
        let cap = store.config().max_file_count;
        let mut seq = 0u64;

        while store.stats().rotations() < rotations {
            store
                .try_add(&json!({"seq": seq}))
                .expect("Failed to add record");
            seq += 1;

            let files = log_files(dir, prefix, extension).len();
            assert!(files <= cap, "{files} files on disk, cap is {cap}");
        }

        assert_eq!(log_files(dir, prefix, extension).len(), cap);
    }

    /// Checks that every archived segment holds only complete, parseable
    /// lines and that the archives together with the active file contain
    /// a contiguous run of `seq` values ending at the newest record.
    pub fn test_archives_are_contiguous(store: &LogStore) {
        let mut seqs = Vec::new();

        for segment in store.segments() {
            let backend = FileBackend::open(&segment.path).expect("Failed to open archive");
            let data = backend.read_to_end().expect("Failed to read archive");
            assert!(data.ends_with(b"\n"), "Archive ends mid-line");

            for line in data.split(|&b| b == b'\n').filter(|l| !l.is_empty()) {
                let record = decode_line(line).expect("Archive holds a bad line");
                seqs.push(record["seq"].as_u64().expect("Missing seq"));
            }
        }

        for line in store.read_raw().expect("Failed to read raw").lines() {
            let record = decode_line(line.as_bytes()).expect("Active file holds a bad line");
            seqs.push(record["seq"].as_u64().expect("Missing seq"));
        }

        for pair in seqs.windows(2) {
            assert_eq!(pair[0] + 1, pair[1], "Gap between {} and {}", pair[0], pair[1]);
        }
    }
}
