//! # JsonLog Testkit
//!
//! Test utilities for jsonlog.
//!
//! This crate provides:
//! - Test fixtures and temporary store helpers
//! - Property-based test generators using proptest
//! - Cross-crate integration test helpers
//! - Fuzz testing harnesses
//! - Stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use jsonlog_testkit::prelude::*;
//! use serde_json::json;
//!
//! with_temp_store(|store| {
//!     store.add(&json!({"event": "start"}));
//!     assert_eq!(store.last(1)[0]["event"], "start");
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::fuzz::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
