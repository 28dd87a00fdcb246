//! Pipeline error types.

/// Specific error conditions for pipeline definition and execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NarrativeErrorKind {
    /// A required step exhausted its retries; the run was aborted
    #[display("Required step '{}' failed: {}", step, message)]
    StepFailed {
        /// Step name
        step: String,
        /// Originating error message
        message: String,
    },
    /// Two steps share a name
    #[display("Step '{}' is defined more than once", _0)]
    DuplicateStep(String),
    /// A step reads the output of a step that is not defined before it
    #[display("Step '{}' reads '{}', which is not defined earlier in the pipeline", step, upstream)]
    UnknownUpstream {
        /// Step name
        step: String,
        /// Referenced upstream step
        upstream: String,
    },
    /// The pipeline has no steps
    #[display("Pipeline has no steps")]
    NoSteps,
    /// No step with the given name exists
    #[display("Unknown step '{}'", _0)]
    UnknownStep(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use almanac_error::{NarrativeError, NarrativeErrorKind};
///
/// let err = NarrativeError::new(NarrativeErrorKind::NoSteps);
/// assert!(format!("{}", err).contains("no steps"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Narrative Error: {} at line {} in {}", kind, line, file)]
pub struct NarrativeError {
    /// The specific error condition
    pub kind: NarrativeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl NarrativeError {
    /// Create a new NarrativeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NarrativeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
