//! Line to record decoding.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use serde::de::DeserializeOwned;

/// Parses one line into a record.
///
/// Surrounding whitespace, including a `\r` left by CRLF line endings, is
/// ignored.
///
/// # Errors
///
/// Returns an error if the line is not UTF-8 or not a JSON object.
pub fn decode_line(line: &[u8]) -> CodecResult<Record> {
    decode_line_as(line)
}

/// Parses one line into any deserializable type.
///
/// # Errors
///
/// Returns an error if the line is not UTF-8 or does not deserialize into `T`.
pub fn decode_line_as<T: DeserializeOwned>(line: &[u8]) -> CodecResult<T> {
    let text = std::str::from_utf8(line).map_err(|_| CodecError::InvalidUtf8)?;
    serde_json::from_str(text.trim()).map_err(|e| CodecError::decoding_failed(e.to_string()))
}
