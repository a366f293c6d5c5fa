//! Clear command implementation.

use super::{format_size, open_store};
use jsonlog_core::Config;
use std::path::Path;

/// Runs the clear command.
pub fn run(path: &Path, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path, config)?;
    let before = std::fs::metadata(store.path())?.len();

    store.clear()?;

    println!(
        "Cleared {} ({} removed, archived segments kept)",
        path.display(),
        format_size(before)
    );
    Ok(())
}
