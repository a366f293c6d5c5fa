//! Tail and raw command implementations.

use super::open_store;
use jsonlog_core::{Config, Record};
use std::path::Path;

/// Runs the tail command.
pub fn run(
    path: &Path,
    config: Config,
    lines: usize,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path, config)?;

    for record in store.last(lines) {
        println!("{}", render(&record, pretty)?);
    }

    Ok(())
}

/// Runs the raw command.
pub fn raw(path: &Path, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path, config)?;
    print!("{}", store.read_raw()?);
    Ok(())
}

fn render(record: &Record, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    }
}
