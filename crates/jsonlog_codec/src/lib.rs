//! # jsonlog Codec
//!
//! JSON line encoding and decoding for jsonlog.
//!
//! Every record is a JSON object serialized onto exactly one line. A batch
//! of records becomes the lines joined by `\n` with one trailing `\n`.
//!
//! ## Usage
//!
//! ```
//! use jsonlog_codec::{decode_line, encode_batch, normalize};
//! use serde_json::json;
//!
//! let records = normalize(json!([{"a": 1}, {"a": 2}])).unwrap();
//! let bytes = encode_batch(&records).unwrap();
//! assert_eq!(bytes, b"{\"a\":1}\n{\"a\":2}\n");
//!
//! let first = decode_line(b"{\"a\":1}").unwrap();
//! assert_eq!(first["a"], 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod record;

pub use decoder::{decode_line, decode_line_as};
pub use encoder::{encode_batch, encode_line};
pub use error::{CodecError, CodecResult};
pub use record::{normalize, stamp, to_record, Record, TIMESTAMP_FIELD};
