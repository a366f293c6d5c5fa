//! Record to line encoding.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;

/// Serializes one record to a single line, without the terminating newline.
///
/// `serde_json` escapes control characters inside strings, so the output
/// never contains a raw `\n`.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if serialization fails.
pub fn encode_line(record: &Record) -> CodecResult<String> {
    serde_json::to_string(record).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

/// Serializes a batch into the bytes of a single append.
///
/// Lines are joined with `\n` and followed by one trailing `\n`. An empty
/// batch encodes to no bytes at all.
///
/// # Errors
///
/// Returns the first encoding failure; nothing is produced in that case.
pub fn encode_batch(records: &[Record]) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();

    for record in records {
        buffer.extend_from_slice(encode_line(record)?.as_bytes());
        buffer.push(b'\n');
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use serde_json::json;

    #[test]
    fn encode_line_is_compact() {
        let record = normalize(json!({"name": "test", "value": 123}))
            .unwrap()
            .remove(0);
        assert_eq!(encode_line(&record).unwrap(), r#"{"name":"test","value":123}"#);
    }

    #[test]
    fn encode_line_escapes_newlines() {
        let record = normalize(json!({"msg": "one\ntwo"})).unwrap().remove(0);
        let line = encode_line(&record).unwrap();
        assert!(!line.contains('\n'));
    }

    #[test]
    fn encode_batch_has_single_trailing_newline() {
        let records = normalize(json!([{"a": 1}, {"a": 2}])).unwrap();
        let bytes = encode_batch(&records).unwrap();
        assert_eq!(bytes, b"{\"a\":1}\n{\"a\":2}\n");
    }

    #[test]
    fn encode_empty_batch() {
        assert!(encode_batch(&[]).unwrap().is_empty());
    }
}
