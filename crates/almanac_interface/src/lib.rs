//! Trait definitions for the text generation services Almanac talks to.
//!
//! Concrete providers live in `almanac_models`. The pipeline engine depends
//! only on [`GenerationService`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::GenerationService;
