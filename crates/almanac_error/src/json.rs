//! JSON error types.

/// Failure to render or parse a JSON document, with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error ({}): {} at line {} in {}", subject, message, line, file)]
pub struct JsonError {
    /// What was being converted, e.g. "insights"
    pub subject: String,
    /// The underlying serde message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError for `subject` at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use almanac_error::{AlmanacError, AlmanacErrorKind, JsonError};
    ///
    /// let err: AlmanacError = JsonError::new("insights", "key must be a string").into();
    /// assert!(matches!(err.kind(), AlmanacErrorKind::Json(_)));
    /// assert!(err.to_string().contains("(insights)"));
    /// ```
    #[track_caller]
    pub fn new(subject: impl Into<String>, message: impl ToString) -> Self {
        let location = std::panic::Location::caller();
        Self {
            subject: subject.into(),
            message: message.to_string(),
            line: location.line(),
            file: location.file(),
        }
    }
}
