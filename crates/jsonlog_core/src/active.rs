//! The active file handle.

use crate::error::CoreResult;
use jsonlog_storage::FileBackend;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The file currently receiving appends.
///
/// Rotation renames the file out from under the open handle, so the handle
/// is dropped right after the rename. If recreating the file then fails, the
/// next access reopens it by path, which also creates it again. The same
/// happens when the file is removed or replaced outside the store.
#[derive(Debug)]
pub(crate) struct ActiveFile {
    path: PathBuf,
    backend: Option<FileBackend>,
}

impl ActiveFile {
    /// Opens the active file, creating it empty if missing.
    pub(crate) fn open(path: &Path) -> CoreResult<Self> {
        let backend = FileBackend::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            backend: Some(backend),
        })
    }

    /// Returns the path of the active file.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the open backend, reopening the file if needed. A reopen also
    /// recreates a missing directory.
    ///
    /// The handle is dropped and the path reopened when the path no longer
    /// names the open file, for example after the file was deleted or moved
    /// away by another process.
    pub(crate) fn backend(&mut self) -> CoreResult<&mut FileBackend> {
        let backend = match self.backend.take() {
            Some(backend) if backend.is_linked()? => backend,
            Some(_) => {
                debug!(path = %self.path.display(), "active file went away, reopening");
                FileBackend::open_with_create_dirs(&self.path)?
            }
            None => FileBackend::open_with_create_dirs(&self.path)?,
        };
        Ok(self.backend.insert(backend))
    }

    /// Drops the handle. Must be called once the file has been renamed.
    pub(crate) fn release(&mut self) {
        self.backend = None;
    }

    /// Creates a fresh empty file at the active path and opens it.
    pub(crate) fn recreate(&mut self) -> CoreResult<()> {
        self.backend = None;
        self.backend = Some(FileBackend::create(&self.path)?);
        Ok(())
    }
}
