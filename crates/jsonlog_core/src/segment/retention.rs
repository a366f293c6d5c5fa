//! Retention pruning of archived segments.

use crate::segment::ArchivedSegment;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Controls how many archived segments survive a rotation.
///
/// With a cap of `max_file_count`, pruning runs over the archive list that
/// already contains the archive just produced by rotation. Once that list
/// holds `max_file_count` or more entries, the oldest are deleted until
/// `max_file_count - 1` remain. Together with the active file this keeps
/// `max_file_count` files on disk.
///
/// A cap of `0` disables pruning: archives accumulate without bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_file_count: usize,
}

impl RetentionPolicy {
    /// Creates a policy with the given cap. `0` disables pruning.
    #[must_use]
    pub const fn new(max_file_count: usize) -> Self {
        Self { max_file_count }
    }

    /// Creates a policy that never deletes anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(0)
    }

    /// Returns `true` if this policy ever deletes segments.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.max_file_count > 0
    }

    /// Returns how many of `archived` segments must go.
    #[must_use]
    pub const fn excess(&self, archived: usize) -> usize {
        if !self.is_enabled() || archived < self.max_file_count {
            0
        } else {
            archived - self.max_file_count + 1
        }
    }

    /// Deletes the oldest segments of `segments` (ordered oldest first)
    /// beyond the cap.
    ///
    /// Every deletion is attempted; a failure, such as a file that is
    /// already gone, is logged and recorded without stopping the rest.
    pub fn prune(&self, segments: &[ArchivedSegment]) -> PruneOutcome {
        let excess = self.excess(segments.len());
        let mut outcome = PruneOutcome::default();

        for segment in &segments[..excess] {
            match fs::remove_file(&segment.path) {
                Ok(()) => {
                    debug!(path = %segment.path.display(), "pruned archived segment");
                    outcome.deleted.push(segment.path.clone());
                }
                Err(error) => {
                    warn!(
                        path = %segment.path.display(),
                        %error,
                        "failed to delete archived segment"
                    );
                    outcome.failed.push(segment.path.clone());
                }
            }
        }

        outcome
    }
}

/// Result of a [`RetentionPolicy::prune`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    /// Segments deleted.
    pub deleted: Vec<PathBuf>,
    /// Segments that could not be deleted.
    pub failed: Vec<PathBuf>,
}
