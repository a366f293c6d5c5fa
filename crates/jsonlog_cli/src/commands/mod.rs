//! CLI command implementations.

pub mod append;
pub mod clear;
pub mod segments;
pub mod tail;

use jsonlog_core::{Config, LogStore};
use std::path::Path;
use tracing::debug;

/// Opens the store at `path`, creating it if needed.
pub fn open_store(path: &Path, config: Config) -> Result<LogStore, Box<dyn std::error::Error>> {
    debug!(
        path = %path.display(),
        max_file_size = config.max_file_size,
        max_file_count = config.max_file_count,
        rotation = config.rotation_enabled,
        "opening store"
    );
    Ok(LogStore::open_with_config(path, config)?)
}

/// Formats a byte count for humans.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
