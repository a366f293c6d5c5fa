//! Benchmarks for jsonlog.
//!
//! The benchmarks live under `benches/`; this crate only carries the data
//! generators they share.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
