//! Benchmark utilities.

use jsonlog_codec::{encode_batch, Record};
use serde_json::{json, Value};

/// Generate a record whose `payload` field holds `payload_size` bytes.
pub fn sample_record(seq: usize, payload_size: usize) -> Value {
    let payload: String = (0..payload_size)
        .map(|i| char::from(b'a' + ((seq + i) % 26) as u8))
        .collect();
    json!({
        "seq": seq,
        "level": "info",
        "payload": payload,
    })
}

/// Generate a batch of records with the given payload size.
pub fn sample_batch(count: usize, payload_size: usize) -> Vec<Value> {
    (0..count).map(|seq| sample_record(seq, payload_size)).collect()
}

/// Generate `count` records already encoded as JSON lines.
pub fn encoded_lines(count: usize, payload_size: usize) -> Vec<u8> {
    let records: Vec<Record> = sample_batch(count, payload_size)
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect();
    encode_batch(&records).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_payload_has_requested_size() {
        let record = sample_record(3, 100);
        assert_eq!(record["payload"].as_str().unwrap().len(), 100);
        assert_eq!(record["seq"], 3);
    }

    #[test]
    fn encoded_lines_are_newline_terminated() {
        let data = encoded_lines(10, 16);
        assert_eq!(data.iter().filter(|&&b| b == b'\n').count(), 10);
        assert!(data.ends_with(b"\n"));
    }
}
