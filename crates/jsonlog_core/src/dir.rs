//! Store directory layout.
//!
//! A store is addressed by the path of its active file. Archived segments
//! live next to it:
//!
//! ```text
//! <dir>/
//! ├─ app.log                                  # active file
//! ├─ app-2026-10-19T08-15-02-123456789Z.log   # archived segment
//! └─ app-2026-10-19T09-40-11-004211873Z.log   # archived segment
//! ```
//!
//! The active file name splits into a base name (`app`) and an extension
//! (`.log`, possibly empty). Every archived segment is named
//! `<base>-<instant><ext>`.

use crate::error::{CoreError, CoreResult};
use crate::segment::{is_segment_name, segment_file_name};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Path arithmetic for one store: active file, directory, segment names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDir {
    /// Directory holding the active file and its archives.
    directory: PathBuf,
    /// File name of the active file, e.g. `app.log`.
    file_name: String,
    /// File name without extension, e.g. `app`.
    base_name: String,
    /// Extension including the leading dot, e.g. `.log`, or empty.
    extension: String,
}

impl StoreDir {
    /// Splits an active file path into its layout. Performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] if the path has no file name or
    /// the file name is not valid UTF-8.
    pub fn new(path: &Path) -> CoreResult<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                CoreError::invalid_path(format!("{} has no file name", path.display()))
            })?
            .to_str()
            .ok_or_else(|| {
                CoreError::invalid_path(format!("{} is not valid UTF-8", path.display()))
            })?
            .to_string();

        let as_path = Path::new(&file_name);
        let base_name = as_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&file_name)
            .to_string();
        let extension = as_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            directory,
            file_name,
            base_name,
            extension,
        })
    }

    /// Creates the directory, and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists and is not a directory, or if
    /// creation fails.
    pub fn create(&self) -> CoreResult<()> {
        if self.directory.exists() && !self.directory.is_dir() {
            return Err(CoreError::invalid_path(format!(
                "{} is not a directory",
                self.directory.display()
            )));
        }
        fs::create_dir_all(&self.directory)?;
        Ok(())
    }

    /// Returns the directory holding the active file and its archives.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the file name of the active file.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the active file name without its extension.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Returns the extension of the active file, with its dot, or `""`.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the path of the active file.
    #[must_use]
    pub fn active_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Returns the path an archive rotated at `instant` gets.
    #[must_use]
    pub fn segment_path(&self, instant: DateTime<Utc>) -> PathBuf {
        self.directory
            .join(segment_file_name(&self.base_name, &self.extension, instant))
    }

    /// Returns `true` if `name` looks like one of this store's archives.
    ///
    /// The name must start with `<base>-`, end with the extension and differ
    /// from the active file name.
    #[must_use]
    pub fn is_segment_name(&self, name: &str) -> bool {
        is_segment_name(name, &self.base_name, &self.extension, &self.file_name)
    }

    /// Syncs the directory so renames and creations are durable.
    #[cfg(unix)]
    pub fn sync(&self) -> CoreResult<()> {
        File::open(&self.directory)?.sync_all()?;
        Ok(())
    }

    /// Syncs the directory so renames and creations are durable.
    ///
    /// NTFS journals metadata itself, and directories cannot be opened for
    /// sync, so this is a no-op off Unix.
    #[cfg(not(unix))]
    pub fn sync(&self) -> CoreResult<()> {
        Ok(())
    }
}
