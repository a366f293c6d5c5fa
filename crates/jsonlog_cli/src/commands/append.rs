//! Append command implementation.

use super::open_store;
use jsonlog_core::{Config, LogStore};
use serde_json::Value;
use std::io::{self, BufRead};
use std::path::Path;

/// Runs the append command.
///
/// With `json` set, appends that value. Otherwise appends one value per
/// non-blank line of stdin.
pub fn run(
    path: &Path,
    config: Config,
    json: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path, config)?;

    let written = match json {
        Some(json) => append_value(&store, json)?,
        None => append_lines(&store, io::stdin().lock())?,
    };

    println!("Appended {written} record(s) to {}", path.display());
    Ok(())
}

fn append_value(store: &LogStore, json: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let value: Value = serde_json::from_str(json)?;
    Ok(store.try_add(&value)?)
}

/// Appends each non-blank line of `reader` as a separate call.
///
/// Stops at the first line that does not parse or cannot be written.
pub fn append_lines<R: BufRead>(
    store: &LogStore,
    reader: R,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut written = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        written += append_value(store, &line).map_err(|e| format!("line {}: {e}", index + 1))?;
    }

    Ok(written)
}
