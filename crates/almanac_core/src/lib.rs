//! Core data types for the Almanac report pipeline.
//!
//! This crate holds the values that flow between the insight extractor, the
//! prompt builder, the generation client and the orchestrator, plus the
//! token budget reducer that keeps prompts under the service ceiling.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod budget;
mod insight;
mod request;
mod role;
mod table;

pub use budget::{BudgetConfig, PromptSection, TRUNCATION_MARKER, TokenBudgetReducer, estimate_tokens};
pub use insight::{InsightCategory, Insights};
pub use request::{GenerationRequest, GenerationRequestBuilder};
pub use role::Role;
pub use table::Table;
