//! # JsonLog Core
//!
//! An append-only store of JSON records, one record per line, with
//! size-based rotation and count-based retention.
//!
//! This crate provides:
//! - [`LogStore`], the store facade: append, tail, raw read, clear
//! - Rotation of the active file into timestamped archived segments
//! - Retention that deletes the oldest archives beyond a cap
//! - A backward chunked tail reader over any storage backend
//!
//! ## Files on disk
//!
//! A store is addressed by the path of its active file, e.g. `logs/app.log`.
//! Once that file reaches the configured size it is renamed to
//! `logs/app-<instant>.log` and a fresh `logs/app.log` takes its place.
//! Reads only ever look at the active file.
//!
//! ## Example
//!
//! ```rust
//! use jsonlog_core::{Config, LogStore};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! let store = LogStore::open_with_config(
//!     dir.path().join("app.log"),
//!     Config::new().max_file_size(4096).max_file_count(3),
//! )?;
//!
//! store.add(&json!({"level": "info", "msg": "started"}));
//!
//! let last = store.last(1);
//! assert_eq!(last[0]["msg"], "started");
//! assert!(last[0]["timestamp"].is_string());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod active;
mod config;
mod dir;
mod error;
mod rotation;
pub mod segment;
mod stats;
mod store;
mod tail;

pub use config::{Config, DEFAULT_MAX_FILE_COUNT, DEFAULT_MAX_FILE_SIZE};
pub use dir::StoreDir;
pub use error::{CoreError, CoreResult};
pub use jsonlog_codec::{Record, TIMESTAMP_FIELD};
pub use rotation::{RotationController, RotationOutcome};
pub use segment::{ArchivedSegment, PruneOutcome, RetentionPolicy};
pub use stats::{StatsSnapshot, StoreStats};
pub use store::LogStore;
pub use tail::tail_lines;

/// Crate version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
