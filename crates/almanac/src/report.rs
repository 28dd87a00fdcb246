//! End-to-end report generation from configuration.

use almanac_core::{Insights, TokenBudgetReducer};
use almanac_error::{AlmanacResult, JsonError};
use almanac_insights::InsightExtractor;
use almanac_interface::GenerationService;
use almanac_models::{OpenAiClient, ServiceCredentials};
use almanac_narrative::{GenerationClient, PipelineExecutor, PipelineRun, marketplace_steps};
use almanac_rate_limit::AlmanacConfig;
use almanac_storage::ReportStorage;
use tracing::{info, instrument};

/// Extracts insights from the configured tables directory.
///
/// # Errors
///
/// Returns an error if the tables directory cannot be read.
pub fn extract_insights(config: &AlmanacConfig) -> AlmanacResult<Insights> {
    InsightExtractor::new().extract_dir(config.output().tables())
}

/// Renders insights as pretty-printed JSON, one array per category.
///
/// # Errors
///
/// Returns a [`JsonError`] if serialization fails.
pub fn insights_json(insights: &Insights) -> AlmanacResult<String> {
    Ok(serde_json::to_string_pretty(insights).map_err(|e| JsonError::new("insights", e))?)
}

/// Builds the OpenAI client described by `config`, reading credentials from
/// the environment.
///
/// # Errors
///
/// Returns an error if `OPENAI_API_KEY` is unset or the HTTP client cannot
/// be built.
pub fn openai_service(config: &AlmanacConfig) -> AlmanacResult<OpenAiClient> {
    let credentials = ServiceCredentials::from_env()?;
    let service = config.service();
    OpenAiClient::new(
        credentials,
        service.model().clone(),
        service.api_base(),
        service.request_timeout(),
    )
}

/// Wraps `service` in a generation client configured from `config`.
pub fn generation_client<S: GenerationService>(
    service: S,
    config: &AlmanacConfig,
) -> GenerationClient<S> {
    GenerationClient::new(service, config.service().system_role().clone())
        .with_policy(config.retry().policy())
        .with_reducer(TokenBudgetReducer::new(*config.budget()))
        .with_limiter(config.rate_limit().limiter())
        .with_print_prompts(*config.output().print_prompts())
}

/// Runs the marketplace report over the configured tables.
///
/// Insights are extracted once, then every step runs in order and its
/// output lands under `output.root`.
///
/// # Errors
///
/// Returns an error if the tables or output directories are unusable, or a
/// file cannot be written. An aborted run is returned as a [`PipelineRun`];
/// call [`PipelineRun::ensure_completed`] to surface it.
#[instrument(skip_all, fields(provider = service.provider_name(), model = service.model_name()))]
pub async fn generate_report<S: GenerationService>(
    service: S,
    config: &AlmanacConfig,
) -> AlmanacResult<PipelineRun> {
    let insights = extract_insights(config)?;
    info!(insights = insights.len(), "Insights ready");

    let storage = ReportStorage::new(config.output().root().clone()).await?;
    let executor = PipelineExecutor::new(generation_client(service, config), storage)
        .with_final_document(config.output().final_document().clone());

    executor.execute(&marketplace_steps(), &insights).await
}
