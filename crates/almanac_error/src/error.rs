//! Top-level error wrapper types.

use crate::{
    ConfigError, ExtractionError, GenerationError, HttpError, JsonError, NarrativeError,
    StorageError,
};

/// Union of every error domain in the workspace.
///
/// # Examples
///
/// ```
/// use almanac_error::{AlmanacError, HttpError};
///
/// let err: AlmanacError = HttpError::new("Connection failed").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AlmanacErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Generation service error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Insight extraction error
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Pipeline error
    #[from(NarrativeError)]
    Narrative(NarrativeError),
    /// JSON rendering error
    #[from(JsonError)]
    Json(JsonError),
}

/// Almanac error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Almanac Error: {}", _0)]
pub struct AlmanacError(Box<AlmanacErrorKind>);

impl AlmanacError {
    /// Create a new error from a kind.
    pub fn new(kind: AlmanacErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AlmanacErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to AlmanacErrorKind
impl<T> From<T> for AlmanacError
where
    T: Into<AlmanacErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Almanac operations.
pub type AlmanacResult<T> = std::result::Result<T, AlmanacError>;
