//! Insight extraction for Almanac.
//!
//! Reads a directory of CSV summaries into [`Table`](almanac_core::Table)s and
//! turns them into categorised insight strings. Extraction is best-effort per
//! table: a table that fails to load or process is recorded as a
//! `data_quality` finding and the remaining tables are still processed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extractor;
mod loader;
mod numeric;
mod rules;

pub use extractor::InsightExtractor;
pub use loader::{TableDirectory, read_table, read_table_with_warnings};
