//! Size-triggered rotation of the active file.
//!
//! ## Steps
//!
//! 1. Stat the active file. Below the threshold, stop.
//! 2. Pick the archive name from the rotation instant.
//! 3. Rename the active file to the archive name.
//! 4. Create a fresh empty active file.
//! 5. List the archives, now including the new one, and prune the oldest.
//!
//! A failure in steps 1 to 3 leaves the active file where it was; it keeps
//! growing until a later rotation succeeds. A failure in step 4 leaves no
//! active file behind, and the next access recreates it.

use crate::active::ActiveFile;
use crate::dir::StoreDir;
use crate::error::CoreResult;
use crate::segment::{discover, PruneOutcome, RetentionPolicy, SegmentClock};
use chrono::Utc;
use jsonlog_storage::StorageBackend;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// What a rotation check did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The active file is below the threshold.
    NotNeeded {
        /// Current size of the active file.
        size: u64,
    },
    /// The active file was archived and replaced.
    Rotated {
        /// Path the former active file now lives at.
        archive: PathBuf,
        /// What retention deleted afterwards.
        pruned: PruneOutcome,
    },
}

/// Decides when to rotate and carries a rotation out.
#[derive(Debug)]
pub struct RotationController {
    max_file_size: u64,
    retention: RetentionPolicy,
    clock: SegmentClock,
}

impl RotationController {
    /// Creates a controller rotating at `max_file_size` bytes.
    #[must_use]
    pub fn new(max_file_size: u64, retention: RetentionPolicy) -> Self {
        Self {
            max_file_size,
            retention,
            clock: SegmentClock::new(),
        }
    }

    /// Returns `true` if a file of `size` bytes must be rotated.
    #[must_use]
    pub const fn should_rotate(&self, size: u64) -> bool {
        size >= self.max_file_size
    }

    /// Rotates the active file if it has reached the threshold.
    pub(crate) fn maybe_rotate(
        &mut self,
        dir: &StoreDir,
        active: &mut ActiveFile,
    ) -> CoreResult<RotationOutcome> {
        let backend = active.backend()?;
        let size = backend.size()?;

        if !self.should_rotate(size) {
            return Ok(RotationOutcome::NotNeeded { size });
        }

        backend.flush()?;

        let instant = self.clock.next(Utc::now());
        let archive = dir.segment_path(instant);

        fs::rename(active.path(), &archive)?;
        active.release();
        debug!(
            active = %active.path().display(),
            archive = %archive.display(),
            size,
            "rotated active file"
        );

        active.recreate()?;

        if let Err(error) = dir.sync() {
            warn!(directory = %dir.directory().display(), %error, "failed to sync log directory");
        }

        let pruned = if self.retention.is_enabled() {
            self.retention.prune(&discover(dir))
        } else {
            PruneOutcome::default()
        };

        Ok(RotationOutcome::Rotated { archive, pruned })
    }
}
