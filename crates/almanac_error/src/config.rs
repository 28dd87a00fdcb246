//! Configuration error types.

/// Configuration error with source location.
///
/// Validation failures name the offending key, e.g. `retry.max_retries`.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Dotted configuration key the error refers to, if any
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an error for an invalid value under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use almanac_error::ConfigError;
    ///
    /// let err = ConfigError::for_key("retry.max_retries", "must be at least 1");
    /// assert_eq!(err.message, "retry.max_retries must be at least 1");
    /// assert_eq!(err.key.as_deref(), Some("retry.max_retries"));
    /// ```
    #[track_caller]
    pub fn for_key(key: impl Into<String>, problem: impl AsRef<str>) -> Self {
        let key = key.into();
        let mut err = Self::new(format!("{} {}", key, problem.as_ref()));
        err.key = Some(key);
        err
    }
}
