//! Insight extraction error types.

/// Conditions that stop insight extraction for a single table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExtractionErrorKind {
    /// The table file could not be read or parsed
    #[display("Failed to read table '{}': {}", table, message)]
    TableRead {
        /// Table name
        table: String,
        /// Error message
        message: String,
    },
    /// A column required by a table rule is absent
    #[display("Table '{}' has no column '{}'", table, column)]
    MissingColumn {
        /// Table name
        table: String,
        /// Column name
        column: String,
    },
    /// A cell expected to be numeric could not be parsed
    #[display("Table '{}' column '{}' has a non-numeric value '{}'", table, column, value)]
    InvalidNumber {
        /// Table name
        table: String,
        /// Column name
        column: String,
        /// Offending cell text
        value: String,
    },
    /// A table rule needs at least one row
    #[display("Table '{}' has no rows", _0)]
    EmptyTable(String),
}

/// Extraction error with source location tracking.
///
/// # Examples
///
/// ```
/// use almanac_error::{ExtractionError, ExtractionErrorKind};
///
/// let err = ExtractionError::new(ExtractionErrorKind::EmptyTable("key_metrics".into()));
/// assert!(format!("{}", err).contains("key_metrics"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", kind, line, file)]
pub struct ExtractionError {
    /// The kind of error that occurred
    pub kind: ExtractionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new ExtractionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExtractionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
