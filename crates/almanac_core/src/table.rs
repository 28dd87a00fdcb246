//! Tabular summaries consumed by the insight extractor.

use serde::{Deserialize, Serialize};

/// A named table of string cells with an arbitrary schema.
///
/// Empty cells and the usual CSV null spellings (`NA`, `N/A`, `NaN`, `null`,
/// `None`) read back as missing.
///
/// # Examples
///
/// ```
/// use almanac_core::Table;
///
/// let table = Table::new(
///     "key_metrics",
///     vec!["metric".into(), "value".into()],
///     vec![vec!["Fill rate".into(), "0.82".into()]],
/// );
///
/// assert!(table.has_column("value"));
/// assert_eq!(table.cell(0, "metric"), Some("Fill rate"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Table {
    /// Table name (file stem for CSV sources)
    name: String,
    /// Column names in file order
    columns: Vec<String>,
    /// Rows of cells, one cell per column
    rows: Vec<Vec<String>>,
}

const NULL_SPELLINGS: [&str; 8] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

fn present(cell: &str) -> Option<&str> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || NULL_SPELLINGS.contains(&trimmed) {
        None
    } else {
        Some(trimmed)
    }
}

impl Table {
    /// Creates a table from its parts.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Whether a column with this exact name exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Non-empty cell text at `row` in `column`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows
            .get(row)
            .and_then(|r| r.get(index))
            .and_then(|c| present(c))
    }

    /// Cells of a column in row order; `None` marks a missing value.
    pub fn column(&self, column: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(index).and_then(|c| present(c)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_spellings_are_missing() {
        let table = Table::new(
            "offers",
            vec!["shift_id".into(), "claimed_at".into()],
            vec![
                vec!["s1".into(), "".into()],
                vec!["s2".into(), "NaN".into()],
                vec!["s3".into(), " 2024-01-02 ".into()],
            ],
        );

        assert_eq!(
            table.column("claimed_at"),
            Some(vec![None, None, Some("2024-01-02")])
        );
        assert_eq!(table.cell(2, "shift_id"), Some("s3"));
        assert_eq!(table.cell(9, "shift_id"), None);
        assert_eq!(table.column("missing"), None);
    }
}
