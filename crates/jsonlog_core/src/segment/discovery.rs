//! Finding archived segments on disk.

use crate::dir::StoreDir;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;

/// An archived segment found by [`discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedSegment {
    /// Full path of the archive.
    pub path: PathBuf,
    /// Birth time of the file, or its modification time where the platform
    /// does not record birth times.
    pub created: SystemTime,
    /// Size in bytes.
    pub size: u64,
}

/// Lists the archived segments of a store, oldest first.
///
/// See [`discover_in`].
pub fn discover(dir: &StoreDir) -> Vec<ArchivedSegment> {
    discover_in(
        dir.directory(),
        dir.base_name(),
        dir.extension(),
        dir.file_name(),
    )
}

/// Lists files in `directory` named `<base_name>-*<extension>`, excluding
/// `active_name`, ordered by creation time ascending.
///
/// Discovery is best effort and never fails:
/// - if the directory cannot be read, a warning is logged and nothing is returned
/// - a candidate that cannot be stat'ed is logged and left out
/// - directories are ignored
///
/// Ties on creation time are broken by file name, which for archives
/// produced by rotation is the rotation instant.
pub fn discover_in(
    directory: &Path,
    base_name: &str,
    extension: &str,
    active_name: &str,
) -> Vec<ArchivedSegment> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(
                directory = %directory.display(),
                %error,
                "failed to list archived segments"
            );
            return Vec::new();
        }
    };

    let mut segments = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(directory = %directory.display(), %error, "failed to read directory entry");
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        if !is_segment_name(&name, base_name, extension, active_name) {
            continue;
        }

        let path = entry.path();
        match stat(&path) {
            Ok(Some(segment)) => segments.push(segment),
            Ok(None) => {}
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to stat archived segment");
            }
        }
    }

    segments.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.path.cmp(&b.path)));
    segments
}

pub(crate) fn is_segment_name(
    name: &str,
    base_name: &str,
    extension: &str,
    active_name: &str,
) -> bool {
    name != active_name
        && name
            .strip_prefix(base_name)
            .is_some_and(|rest| rest.starts_with('-'))
        && name.ends_with(extension)
}

fn stat(path: &Path) -> std::io::Result<Option<ArchivedSegment>> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Ok(None);
    }

    let created = metadata.created().or_else(|_| metadata.modified())?;

    Ok(Some(ArchivedSegment {
        path: path.to_path_buf(),
        created,
        size: metadata.len(),
    }))
}
