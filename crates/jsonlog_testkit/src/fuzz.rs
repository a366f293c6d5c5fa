//! Fuzz testing harnesses for jsonlog.
//!
//! This module provides fuzz targets that can be used with cargo-fuzz
//! or other fuzzing frameworks.

use jsonlog_codec::{decode_line, encode_line, normalize};
use jsonlog_core::{tail_lines, LogStore};
use jsonlog_storage::InMemoryBackend;
use serde_json::{json, Value};

/// Fuzz target for line decoding.
///
/// Tests that arbitrary byte sequences either decode to a record or
/// return an error. Never panics.
pub fn fuzz_decode_line(data: &[u8]) {
    let _ = decode_line(data);
}

/// Fuzz target for the line round trip.
///
/// A line that decodes must re-encode to a single line that decodes to the
/// same record.
pub fn fuzz_line_roundtrip(data: &[u8]) {
    if let Ok(record) = decode_line(data) {
        let encoded = encode_line(&record).expect("Decoded record must re-encode");
        assert!(!encoded.contains('\n'), "Encoded record spans lines");

        let decoded = decode_line(encoded.as_bytes()).expect("Re-encoded line must decode");
        assert_eq!(record, decoded, "Roundtrip mismatch");
    }
}

/// Fuzz target for normalizing arbitrary JSON into records.
pub fn fuzz_normalize(data: &[u8]) {
    if let Ok(value) = serde_json::from_slice::<Value>(data) {
        let expected_ok = match &value {
            Value::Object(_) => true,
            Value::Array(items) => items.iter().all(Value::is_object),
            _ => false,
        };
        assert_eq!(normalize(value).is_ok(), expected_ok);
    }
}

/// Fuzz target for the backward tail reader.
///
/// The first byte picks `n`; the rest is the file content. The result must
/// match a plain forward split.
pub fn fuzz_tail_lines(data: &[u8]) {
    let Some((&n, content)) = data.split_first() else {
        return;
    };
    let n = n as usize;

    let backend = InMemoryBackend::with_data(content.to_vec());
    let actual = tail_lines(&backend, n).expect("In-memory reads cannot fail");

    let trimmed = content.strip_suffix(b"\n").unwrap_or(content);
    let all: Vec<&[u8]> = if content.is_empty() {
        Vec::new()
    } else {
        trimmed.split(|&b| b == b'\n').collect()
    };
    let expected: Vec<Vec<u8>> = if n == 0 {
        Vec::new()
    } else {
        all[all.len().saturating_sub(n)..]
            .iter()
            .map(|line| line.to_vec())
            .collect()
    };

    assert_eq!(actual, expected, "Tail mismatch for n = {n}");
}

/// Structured fuzzing input for store operations.
#[derive(Debug, Clone)]
pub enum FuzzOp {
    /// Add a record with one field.
    Add {
        /// Field value.
        value: u8,
        /// Padding length, to drive rotation.
        padding: u8,
    },
    /// Add a batch of records.
    AddBatch {
        /// Number of records.
        count: u8,
    },
    /// Add something that is not a record.
    AddInvalid,
    /// Read the last records.
    Last {
        /// Number of records.
        n: u8,
    },
    /// Read the raw file.
    ReadRaw,
    /// Clear the active file.
    Clear,
}

impl FuzzOp {
    /// Parse operations from fuzzer input.
    pub fn parse_sequence(data: &[u8]) -> Vec<FuzzOp> {
        let mut ops = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            let op_type = data[offset];
            offset += 1;

            let op = match op_type % 6 {
                0 => {
                    if offset + 2 > data.len() {
                        break;
                    }
                    let op = FuzzOp::Add {
                        value: data[offset],
                        padding: data[offset + 1],
                    };
                    offset += 2;
                    op
                }
                1 => {
                    let Some(&count) = data.get(offset) else {
                        break;
                    };
                    offset += 1;
                    FuzzOp::AddBatch { count: count % 16 }
                }
                2 => FuzzOp::AddInvalid,
                3 => {
                    let Some(&n) = data.get(offset) else {
                        break;
                    };
                    offset += 1;
                    FuzzOp::Last { n }
                }
                4 => FuzzOp::ReadRaw,
                5 => FuzzOp::Clear,
                _ => break,
            };

            ops.push(op);
        }

        ops
    }

    /// Execute operations on a store.
    ///
    /// Checks after every step that tail reads never return more than asked
    /// for.
    pub fn execute_sequence(ops: &[FuzzOp], store: &LogStore) {
        for op in ops {
            match op {
                FuzzOp::Add { value, padding } => {
                    let pad = "p".repeat(*padding as usize);
                    store.add(&json!({"v": value, "pad": pad}));
                }
                FuzzOp::AddBatch { count } => {
                    let records: Vec<_> = (0..*count).map(|i| json!({"b": i})).collect();
                    store.add(&records);
                }
                FuzzOp::AddInvalid => {
                    assert!(store.try_add(&json!([1, 2, 3])).is_err());
                }
                FuzzOp::Last { n } => {
                    let n = *n as usize;
                    assert!(store.last(n).len() <= n);
                }
                FuzzOp::ReadRaw => {
                    let _ = store.read_raw();
                }
                FuzzOp::Clear => {
                    let _ = store.clear();
                }
            }
        }
    }
}

/// Fuzz target for store operation sequences.
///
/// Runs against a store in a fresh temporary directory with a small
/// rotation threshold, so rotation and retention run often.
pub fn fuzz_store_operations(data: &[u8]) {
    let ops = FuzzOp::parse_sequence(data);
    if ops.is_empty() {
        return;
    }

    let Ok(dir) = tempfile::tempdir() else {
        return;
    };
    let config = jsonlog_core::Config::new()
        .max_file_size(512)
        .max_file_count(3);
    let Ok(store) = LogStore::open_with_config(dir.path().join("fuzz.log"), config) else {
        return;
    };

    FuzzOp::execute_sequence(&ops, &store);
    assert!(store.segments().len() <= 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{DefaultHasher, Hash, Hasher};

    /// Generate pseudo-random data for fuzzing based on a seed.
    fn generate_random_data(seed: u64, len: usize) -> Vec<u8> {
        let mut hasher = DefaultHasher::new();
        let mut result = Vec::with_capacity(len);
        let mut state = seed;

        for _ in 0..len {
            state.hash(&mut hasher);
            state = hasher.finish();
            hasher = DefaultHasher::new();
            result.push((state & 0xFF) as u8);
        }

        result
    }

    #[test]
    fn test_fuzz_decode_line_empty() {
        fuzz_decode_line(&[]);
    }

    #[test]
    fn test_fuzz_decode_line_garbage() {
        for seed in 0..50 {
            fuzz_decode_line(&generate_random_data(seed, 64));
        }
        fuzz_decode_line(&[0xff, 0xfe, 0x00]);
    }

    #[test]
    fn test_fuzz_line_roundtrip_valid() {
        fuzz_line_roundtrip(br#"{"a":1,"b":[true,null],"c":{"d":"e"}}"#);
        fuzz_line_roundtrip(br#"  {"text":"line\nbreak"}  "#);
    }

    #[test]
    fn test_fuzz_normalize() {
        fuzz_normalize(br#"{"a":1}"#);
        fuzz_normalize(br#"[{"a":1},{"b":2}]"#);
        fuzz_normalize(br#"[{"a":1},2]"#);
        fuzz_normalize(b"42");
        fuzz_normalize(b"[]");
    }

    #[test]
    fn test_fuzz_tail_lines() {
        fuzz_tail_lines(&[]);
        fuzz_tail_lines(b"\x02a\nb\nc\n");
        fuzz_tail_lines(b"\x05\n\n\n");
        for seed in 0..50 {
            let mut data = generate_random_data(seed, 256);
            for byte in data.iter_mut().skip(1) {
                if *byte % 7 == 0 {
                    *byte = b'\n';
                }
            }
            fuzz_tail_lines(&data);
        }
    }

    #[test]
    fn test_parse_fuzz_ops() {
        let data = [0u8, 1, 2, 1, 5, 2, 3, 10, 4, 5];
        let ops = FuzzOp::parse_sequence(&data);
        assert_eq!(ops.len(), 6);
        assert!(matches!(ops[0], FuzzOp::Add { value: 1, padding: 2 }));
        assert!(matches!(ops[1], FuzzOp::AddBatch { count: 5 }));
        assert!(matches!(ops[2], FuzzOp::AddInvalid));
        assert!(matches!(ops[3], FuzzOp::Last { n: 10 }));
        assert!(matches!(ops[4], FuzzOp::ReadRaw));
        assert!(matches!(ops[5], FuzzOp::Clear));
    }

    #[test]
    fn test_fuzz_store_operations_empty() {
        fuzz_store_operations(&[]);
    }

    #[test]
    fn test_fuzz_store_operations_random() {
        for seed in 0..10 {
            fuzz_store_operations(&generate_random_data(seed, 200));
        }
    }
}
