//! Generation service error types.
//!
//! The generative service boundary reports failures through this closed set
//! of kinds. Retry logic dispatches on the kind, never on message text.

/// Failure conditions reported by a generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The request exceeded the service's input-size limit
    #[display("Request exceeded the input size limit: {}", _0)]
    Overflow(String),
    /// The service throttled the request
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// The request could not reach the service or timed out
    #[display("Connection failed: {}", _0)]
    ConnectionFailed(String),
    /// The service answered but produced no text
    #[display("Service returned an empty response")]
    EmptyResponse,
    /// Any other service failure
    #[display("Service error: {}", _0)]
    Unknown(String),
}

impl GenerationErrorKind {
    /// Whether the failure was caused by the size of the request.
    ///
    /// Overflow failures are retried immediately with a smaller payload.
    pub fn is_overflow(&self) -> bool {
        matches!(self, GenerationErrorKind::Overflow(_))
    }

    /// Whether the failure should be retried unchanged after a backoff delay.
    pub fn is_transient(&self) -> bool {
        !self.is_overflow()
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use almanac_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::RateLimited("429".into()));
/// assert!(err.kind.is_transient());
/// assert!(format!("{}", err).contains("Rate limited"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`GenerationErrorKind::is_overflow`].
    pub fn is_overflow(&self) -> bool {
        self.kind.is_overflow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_is_not_transient() {
        let kind = GenerationErrorKind::Overflow("context length".to_string());
        assert!(kind.is_overflow());
        assert!(!kind.is_transient());
    }

    #[test]
    fn test_other_kinds_are_transient() {
        for kind in [
            GenerationErrorKind::RateLimited("slow down".to_string()),
            GenerationErrorKind::ConnectionFailed("reset".to_string()),
            GenerationErrorKind::EmptyResponse,
            GenerationErrorKind::Unknown("teapot".to_string()),
        ] {
            assert!(kind.is_transient(), "{kind} should be transient");
        }
    }
}
