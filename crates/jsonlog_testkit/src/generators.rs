//! Property-based test generators using proptest.
//!
//! Provides strategies for generating JSON records and append sequences.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating field names.
///
/// Never generates `timestamp`, so generated records survive stamping
/// unchanged apart from the added field.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}")
        .expect("Invalid regex")
        .prop_filter("Field name must not collide with the timestamp", |s| {
            s != jsonlog_codec::TIMESTAMP_FIELD
        })
}

/// Strategy for generating JSON scalars.
pub fn json_scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1_000_000i64..1_000_000).prop_map(|quarters| Value::from(quarters as f64 / 4.0)),
        ".{0,32}".prop_map(Value::String),
    ]
}

/// Strategy for generating JSON values nested up to a few levels.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    json_scalar_strategy().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((field_name_strategy(), inner), 0..4)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

/// Strategy for generating records: JSON objects with up to eight fields.
pub fn record_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec((field_name_strategy(), json_value_strategy()), 0..8).prop_map(
        |fields| {
            let mut map = Map::new();
            for (name, value) in fields {
                map.insert(name, value);
            }
            Value::Object(map)
        },
    )
}

/// Strategy for generating a batch of records.
pub fn batch_strategy(max_len: usize) -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(record_strategy(), 0..=max_len)
}

/// One call to a store's append API.
#[derive(Debug, Clone)]
pub enum AppendOperation {
    /// A single record.
    Single(Value),
    /// A batch written with one append.
    Batch(Vec<Value>),
}

impl AppendOperation {
    /// Returns the records this operation writes, in order.
    pub fn records(&self) -> Vec<Value> {
        match self {
            Self::Single(record) => vec![record.clone()],
            Self::Batch(records) => records.clone(),
        }
    }

    /// Returns the value passed to `add`.
    pub fn payload(&self) -> Value {
        match self {
            Self::Single(record) => record.clone(),
            Self::Batch(records) => Value::Array(records.clone()),
        }
    }
}

/// Strategy for generating append operations.
pub fn append_operation_strategy() -> impl Strategy<Value = AppendOperation> {
    prop_oneof![
        3 => record_strategy().prop_map(AppendOperation::Single),
        1 => batch_strategy(5).prop_map(AppendOperation::Batch),
    ]
}

/// Strategy for generating a sequence of append operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<AppendOperation>> {
    prop::collection::vec(append_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
