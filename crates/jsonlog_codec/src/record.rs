//! The record type and the transformations applied before encoding.

use crate::error::{CodecError, CodecResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the field carrying the generation time of a record.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// One log entry: a JSON object with an open key set.
///
/// Keys keep their insertion order, so a record is written back exactly in
/// the order it was built.
pub type Record = Map<String, Value>;

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Splits a value into the records it stands for.
///
/// A JSON array is a batch and yields one record per element; any other
/// value is a single record. Every record must be a JSON object.
///
/// # Errors
///
/// Returns [`CodecError::NotAnObject`] if the value, or any element of a
/// batch, is not an object.
pub fn normalize(value: Value) -> CodecResult<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(CodecError::NotAnObject {
                    kind: kind_of(&other),
                }),
            })
            .collect(),
        Value::Object(record) => Ok(vec![record]),
        other => Err(CodecError::NotAnObject {
            kind: kind_of(&other),
        }),
    }
}

/// Serializes any value and normalizes it into records.
///
/// # Errors
///
/// Returns an error if serialization fails or the result is not an object
/// or an array of objects.
pub fn to_record<T: Serialize + ?Sized>(entry: &T) -> CodecResult<Vec<Record>> {
    let value =
        serde_json::to_value(entry).map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    normalize(value)
}

/// Returns `record` with `timestamp` as its first key.
///
/// A `timestamp` key already present in the record is replaced: the
/// supplied value always wins and the remaining keys keep their order.
#[must_use]
pub fn stamp(record: Record, timestamp: &str) -> Record {
    let mut stamped = Map::with_capacity(record.len() + 1);
    stamped.insert(
        TIMESTAMP_FIELD.to_string(),
        Value::String(timestamp.to_string()),
    );

    for (key, value) in record {
        if key != TIMESTAMP_FIELD {
            stamped.insert(key, value);
        }
    }

    stamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_single_object() {
        let records = normalize(json!({"a": 1})).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["a"], 1);
    }

    #[test]
    fn normalize_array_is_a_batch() {
        let records = normalize(json!([{"a": 1}, {"a": 2}, {"a": 3}])).unwrap();
        let values: Vec<_> = records.iter().map(|r| r["a"].clone()).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn normalize_empty_array() {
        assert!(normalize(json!([])).unwrap().is_empty());
    }

    #[test]
    fn normalize_rejects_scalars() {
        assert_eq!(
            normalize(json!(42)),
            Err(CodecError::NotAnObject { kind: "number" })
        );
        assert_eq!(
            normalize(json!([{"a": 1}, "x"])),
            Err(CodecError::NotAnObject { kind: "string" })
        );
    }

    #[test]
    fn to_record_from_struct() {
        #[derive(Serialize)]
        struct Event {
            name: &'static str,
            value: u32,
        }

        let records = to_record(&Event {
            name: "test",
            value: 123,
        })
        .unwrap();
        assert_eq!(records[0]["name"], "test");
        assert_eq!(records[0]["value"], 123);
    }

    #[test]
    fn stamp_puts_timestamp_first() {
        let record = normalize(json!({"value": 1, "name": "x"})).unwrap().remove(0);
        let stamped = stamp(record, "2026-10-19T08:15:02.123Z");

        let keys: Vec<_> = stamped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["timestamp", "value", "name"]);
    }

    #[test]
    fn stamp_overrides_caller_timestamp() {
        let record = normalize(json!({"timestamp": "yesterday", "value": 1}))
            .unwrap()
            .remove(0);
        let stamped = stamp(record, "2026-10-19T08:15:02.123Z");

        assert_eq!(stamped.len(), 2);
        assert_eq!(stamped[TIMESTAMP_FIELD], "2026-10-19T08:15:02.123Z");
        assert_eq!(stamped["value"], 1);
    }
}
