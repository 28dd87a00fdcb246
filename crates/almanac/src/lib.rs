//! Almanac - multi-step generated strategic reports.
//!
//! Almanac reads a directory of CSV summary tables, turns them into
//! categorised insight strings, and runs a chain of dependent generation
//! steps over them. Each step's prompt combines fixed instructions, the
//! insights relevant to its topic and excerpts of earlier steps' outputs.
//! Prompts are kept under a character budget, failed calls are retried with
//! backoff, and oversized prompts are shrunk and resent.
//!
//! # Architecture
//!
//! - `almanac_error` - Error types
//! - `almanac_core` - Tables, insights, requests and the token budget reducer
//! - `almanac_interface` - The `GenerationService` trait
//! - `almanac_rate_limit` - Retry policy, request pacing and configuration
//! - `almanac_storage` - Markdown report persistence
//! - `almanac_insights` - CSV loading and insight extraction
//! - `almanac_models` - OpenAI-compatible generation client
//! - `almanac_narrative` - Prompt templates, steps and the pipeline executor
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;
mod report;

pub use observability::{ObservabilityConfig, init_observability_with_config};
pub use report::{
    extract_insights, generate_report, generation_client, insights_json, openai_service,
};

pub use almanac_error::{
    AlmanacError, AlmanacErrorKind, AlmanacResult, ConfigError, ExtractionError,
    ExtractionErrorKind, GenerationError, GenerationErrorKind, HttpError, JsonError,
    NarrativeError, NarrativeErrorKind, StorageError, StorageErrorKind,
};

pub use almanac_core::{
    BudgetConfig, GenerationRequest, GenerationRequestBuilder, InsightCategory, Insights,
    PromptSection, Role, TRUNCATION_MARKER, Table, TokenBudgetReducer, estimate_tokens,
};

pub use almanac_interface::GenerationService;

pub use almanac_rate_limit::{
    AlmanacConfig, OutputConfig, RateLimitConfig, RateLimiter, RetryConfig, RetryPolicy,
    ServiceConfig,
};

pub use almanac_storage::ReportStorage;

pub use almanac_insights::{InsightExtractor, TableDirectory, read_table};

pub use almanac_models::{OpenAiClient, ServiceCredentials, classify_failure};

pub use almanac_narrative::{
    Excerpt, FnPromptBuilder, GenerationClient, InsightSection, PipelineExecutor, PipelineRun,
    PromptBuilder, PromptTemplate, StepOutcome, StepOutputs, StepRecord, StepSpec,
    combine_sections, find_step, marketplace_steps, truncate_excerpt, validate_steps,
};
