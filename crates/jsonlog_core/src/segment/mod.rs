//! Archived segments.
//!
//! An archived segment is a former active file, renamed at rotation time and
//! never written again. This module names segments, finds them on disk and
//! deletes the oldest ones when retention asks for it.
//!
//! ## Naming
//!
//! ```text
//! <base>-<rotation instant><ext>
//! app-2026-10-19T08-15-02-123456789Z.log
//! ```
//!
//! The instant is RFC 3339 in UTC with nanoseconds, with every `:` and `.`
//! replaced by `-` so the name is valid on every common filesystem.

mod discovery;
mod naming;
mod retention;

pub(crate) use discovery::is_segment_name;
pub use discovery::{discover, discover_in, ArchivedSegment};
pub use naming::{format_instant, segment_file_name, SegmentClock};
pub use retention::{PruneOutcome, RetentionPolicy};
