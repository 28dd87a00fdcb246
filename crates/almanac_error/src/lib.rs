//! Error types for the Almanac workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use almanac_error::{AlmanacResult, ConfigError};
//!
//! fn load() -> AlmanacResult<String> {
//!     Err(ConfigError::new("missing [retry] section"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod extraction;
mod generation;
mod http;
mod json;
mod narrative;
mod storage;

pub use config::ConfigError;
pub use error::{AlmanacError, AlmanacErrorKind, AlmanacResult};
pub use extraction::{ExtractionError, ExtractionErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use narrative::{NarrativeError, NarrativeErrorKind};
pub use storage::{StorageError, StorageErrorKind};
