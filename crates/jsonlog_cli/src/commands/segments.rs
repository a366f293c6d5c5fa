//! Segments command implementation.

use super::{format_size, open_store};
use chrono::{DateTime, SecondsFormat, Utc};
use jsonlog_core::{ArchivedSegment, Config};
use serde::Serialize;
use std::path::Path;

/// One archived segment, as printed.
#[derive(Debug, Serialize)]
pub struct SegmentInfo {
    /// File name of the archive.
    pub name: String,
    /// Creation time, RFC 3339 UTC.
    pub created: String,
    /// Size in bytes.
    pub size: u64,
}

impl From<&ArchivedSegment> for SegmentInfo {
    fn from(segment: &ArchivedSegment) -> Self {
        Self {
            name: segment
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            created: DateTime::<Utc>::from(segment.created)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            size: segment.size,
        }
    }
}

/// Segment listing result.
#[derive(Debug, Serialize)]
pub struct SegmentsResult {
    /// Active file path.
    pub path: String,
    /// Active file size in bytes.
    pub active_size: u64,
    /// Archived segments, oldest first.
    pub segments: Vec<SegmentInfo>,
}

/// Runs the segments command.
pub fn run(path: &Path, config: Config, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(path, config)?;

    let result = SegmentsResult {
        path: store.path().display().to_string(),
        active_size: std::fs::metadata(store.path())?.len(),
        segments: store.segments().iter().map(SegmentInfo::from).collect(),
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &SegmentsResult) {
    println!("Active: {} ({})", result.path, format_size(result.active_size));

    if result.segments.is_empty() {
        println!("No archived segments");
        return;
    }

    println!("Archived segments:");
    for segment in &result.segments {
        println!(
            "  {}  {}  {}",
            segment.created,
            segment.name,
            format_size(segment.size)
        );
    }
}
