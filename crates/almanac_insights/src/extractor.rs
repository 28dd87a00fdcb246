//! The insight extractor.

use crate::loader::{TableDirectory, read_table_with_warnings, table_name};
use crate::rules::process;
use almanac_core::{InsightCategory, Insights, Table};
use almanac_error::{AlmanacResult, ExtractionError};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Turns tabular summaries into categorised insight strings.
///
/// Validation findings from every table are collected and appended to the
/// `data_quality` category after the table-specific entries, and cleanup
/// (blank removal, deduplication) runs once at the end.
///
/// # Examples
///
/// ```
/// use almanac_core::{InsightCategory, Table};
/// use almanac_insights::InsightExtractor;
///
/// let key_metrics = Table::new(
///     "key_metrics",
///     vec!["category".into(), "metric".into(), "value".into()],
///     vec![vec!["Supply".into(), "Active workers".into(), "1200".into()]],
/// );
///
/// let insights = InsightExtractor::new().extract([key_metrics]);
/// assert_eq!(
///     insights.get(InsightCategory::MarketplaceSummary),
///     ["Supply - Active workers: 1200"]
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightExtractor;

impl InsightExtractor {
    /// Creates an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts insights from already-loaded tables, in the order given.
    #[instrument(skip_all)]
    pub fn extract<I>(&self, tables: I) -> Insights
    where
        I: IntoIterator<Item = Table>,
    {
        self.extract_results(
            tables
                .into_iter()
                .map(|table| (table.name().clone(), Ok((table, Vec::new())))),
        )
    }

    /// Loads every CSV under `dir` in sorted path order and extracts insights.
    ///
    /// A file that fails to parse is recorded like any other table failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` is not a readable directory.
    #[instrument(skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn extract_dir(&self, dir: impl AsRef<Path>) -> AlmanacResult<Insights> {
        let files = TableDirectory::new(dir).scan()?;
        let loaded = files
            .into_iter()
            .map(|path| (table_name(&path), read_table_with_warnings(&path)));
        Ok(self.extract_results(loaded))
    }

    fn extract_results<I>(&self, tables: I) -> Insights
    where
        I: IntoIterator<Item = (String, Result<(Table, Vec<String>), ExtractionError>)>,
    {
        let mut insights = Insights::new();
        let mut validations = Vec::new();
        let mut processed = 0usize;

        for (name, loaded) in tables {
            info!("Extracting insights from {}", name);
            let outcome = loaded.and_then(|(table, warnings)| {
                process(&table).map(|findings| (findings, warnings))
            });
            match outcome {
                Ok((findings, warnings)) => {
                    for (category, entries) in findings.insights.iter() {
                        insights.extend(category, entries.iter().cloned());
                    }
                    validations.extend(findings.validations);
                    validations.extend(warnings);
                    processed += 1;
                }
                Err(e) => {
                    warn!(table = %name, error = %e.kind, "Failed to extract insights");
                    validations.push(format!("ERROR: Failed to process {}: {}", name, e.kind));
                }
            }
        }

        insights.extend(InsightCategory::DataQuality, validations);
        insights.cleanup();

        info!(
            tables = processed,
            insights = insights.len(),
            "Extracted key insights from data tables with validation"
        );
        insights
    }
}
