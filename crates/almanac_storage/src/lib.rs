//! Markdown report persistence for Almanac.
//!
//! Every step output, every step failure and the combined document are
//! written as standalone files under one output root.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;

pub use filesystem::ReportStorage;
