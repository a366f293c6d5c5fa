//! # jsonlog Storage
//!
//! Byte-level storage for the active file of a jsonlog store.
//!
//! Backends are **opaque byte stores**: they append, read ranges, report
//! their size and truncate. They know nothing about JSON lines, rotation
//! or archived segments; `jsonlog_core` owns all of that.
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - The active file on disk
//! - [`InMemoryBackend`] - For tests and benchmarks
//!
//! ## Example
//!
//! ```rust
//! use jsonlog_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.append(b"{\"a\":1}\n").unwrap();
//! assert_eq!(backend.read_to_end().unwrap(), b"{\"a\":1}\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
