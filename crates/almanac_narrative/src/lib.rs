//! Prompt chain execution engine for Almanac.
//!
//! A report is a list of [`StepSpec`]s. Each step renders a prompt from the
//! extracted insights and the outputs of earlier steps, sends it through a
//! [`GenerationClient`] that retries and shrinks oversized prompts, and has its
//! output persisted. [`PipelineExecutor`] drives the list and assembles the
//! combined report.
//!
//! ```no_run
//! use almanac_core::Insights;
//! use almanac_interface::GenerationService;
//! use almanac_narrative::{GenerationClient, PipelineExecutor, marketplace_steps};
//! use almanac_storage::ReportStorage;
//!
//! # async fn run<S: GenerationService>(service: S, insights: Insights) -> almanac_error::AlmanacResult<()> {
//! let client = GenerationClient::new(service, "You are a marketplace data scientist.");
//! let storage = ReportStorage::new("output").await?;
//! let run = PipelineExecutor::new(client, storage)
//!     .execute(&marketplace_steps(), &insights)
//!     .await?;
//! run.ensure_completed()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod executor;
mod prompts;
mod step;
mod template;

pub use client::GenerationClient;
pub use executor::{
    DOCUMENT_INTRO, DOCUMENT_TITLE, FINAL_DOCUMENT, PipelineExecutor, PipelineRun, StepOutcome,
    StepRecord, combine_sections,
};
pub use prompts::{
    BEHAVIORAL_ECONOMICS, COMPETITIVE_ADVANTAGE, CROSS_SIDE_MATCHING, DECISION_SCIENCE,
    EXECUTIVE_SUMMARY, KEY_INSIGHTS, KEY_SEGMENTS, LONGITUDINAL_TRENDS, MARKET_STRUCTURE,
    MARKETPLACE_DYNAMICS, MARKETPLACE_EQUILIBRIUM, NETWORK_EFFECTS, NEXT_STEPS,
    PRICING_OPTIMIZATION, RETENTION_INTERVENTIONS, SEGMENT_EXAMPLES, STRATEGIC_RECOMMENDATIONS,
    WORKER_JOURNEY, marketplace_steps,
};
pub use step::{FnPromptBuilder, PromptBuilder, StepOutputs, StepSpec, find_step, validate_steps};
pub use template::{
    ELLIPSIS, Excerpt, InsightSection, InsightSectionBuilder, PromptTemplate,
    PromptTemplateBuilder, truncate_excerpt,
};
