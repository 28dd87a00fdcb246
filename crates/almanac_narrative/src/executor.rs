//! Pipeline execution.
//!
//! The executor runs a validated step list in order, threading each step's
//! output into the prompts of later steps and persisting every output as it
//! arrives. A failed required step aborts the run; a failed optional step is
//! recorded and its output treated as empty.

use crate::client::GenerationClient;
use crate::step::{StepOutputs, StepSpec, validate_steps};
use almanac_core::Insights;
use almanac_error::{AlmanacResult, NarrativeError, NarrativeErrorKind};
use almanac_interface::GenerationService;
use almanac_storage::ReportStorage;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// Title line of the combined report.
pub const DOCUMENT_TITLE: &str = "# Comprehensive Marketplace Analysis";

/// Paragraph opening the combined report.
pub const DOCUMENT_INTRO: &str = "This report synthesizes multiple layers of analysis on the marketplace, from fundamental structure to strategic recommendations and implementation plans.";

/// Default file name of the combined report.
pub const FINAL_DOCUMENT: &str = "final_multi_step_analysis.md";

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StepOutcome {
    /// The step produced text.
    #[display("succeeded")]
    Succeeded,
    /// An optional step failed; its output is empty.
    #[display("degraded: {}", _0)]
    Degraded(String),
    /// A required step failed and the run stopped.
    #[display("aborted: {}", _0)]
    Aborted(String),
}

impl StepOutcome {
    /// Whether the step produced text.
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

/// Execution record of one step.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StepRecord {
    /// Step name
    name: String,
    /// Section title
    title: String,
    /// Whether failure aborts the run
    required: bool,
    /// How the step ended
    outcome: StepOutcome,
    /// File written for this step: the output, or the error report
    path: PathBuf,
}

/// The trace of one pipeline execution.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    records: Vec<StepRecord>,
    outputs: StepOutputs,
    warnings: Vec<String>,
    final_document: String,
    document_path: Option<PathBuf>,
    failure: Option<NarrativeError>,
}

impl PipelineRun {
    /// Per-step records in execution order. Steps after an abort are absent.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Output of every step that ran; degraded steps map to `""`.
    pub fn outputs(&self) -> &StepOutputs {
        &self.outputs
    }

    /// One entry per degraded optional step.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Combined report of every step that produced text.
    pub fn final_document(&self) -> &str {
        &self.final_document
    }

    /// Where the combined report was written; `None` for an aborted run.
    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    /// Whether every required step succeeded.
    pub fn is_completed(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts an aborted run into its originating error.
    ///
    /// # Errors
    ///
    /// [`NarrativeErrorKind::StepFailed`] naming the required step that failed.
    pub fn ensure_completed(&self) -> Result<(), NarrativeError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Concatenates step outputs under their section titles.
///
/// Sections with empty content are left out entirely.
///
/// # Examples
///
/// ```
/// use almanac_narrative::combine_sections;
///
/// let doc = combine_sections([("Summary", "All good."), ("Skipped", "")]);
/// assert!(doc.ends_with("## Summary\n\nAll good.\n\n"));
/// assert!(!doc.contains("Skipped"));
/// ```
pub fn combine_sections<'a, I>(sections: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut document = format!("{}\n\n{}\n\n", DOCUMENT_TITLE, DOCUMENT_INTRO);
    for (title, content) in sections {
        if content.is_empty() {
            continue;
        }
        document.push_str("## ");
        document.push_str(title);
        document.push_str("\n\n");
        document.push_str(content);
        document.push_str("\n\n");
    }
    document
}

/// Runs step lists against a generation service and persists the results.
pub struct PipelineExecutor<S> {
    client: GenerationClient<S>,
    storage: ReportStorage,
    final_document: String,
}

impl<S: GenerationService> PipelineExecutor<S> {
    /// Creates an executor writing under `storage`'s root.
    pub fn new(client: GenerationClient<S>, storage: ReportStorage) -> Self {
        Self {
            client,
            storage,
            final_document: FINAL_DOCUMENT.to_string(),
        }
    }

    /// Changes the file name of the combined report.
    pub fn with_final_document(mut self, file_name: impl Into<String>) -> Self {
        self.final_document = file_name.into();
        self
    }

    /// The generation client in use.
    pub fn client(&self) -> &GenerationClient<S> {
        &self.client
    }

    /// Executes `steps` once, in order.
    ///
    /// A required step failure ends the run early; the returned
    /// [`PipelineRun`] then holds the partial document and reports the
    /// failure through [`PipelineRun::ensure_completed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the step list is invalid or a file cannot be
    /// written. Generation failures are reported through the run instead.
    #[instrument(skip_all, fields(steps = steps.len()))]
    pub async fn execute(&self, steps: &[StepSpec], insights: &Insights) -> AlmanacResult<PipelineRun> {
        validate_steps(steps)?;

        let mut outputs = StepOutputs::new();
        let mut records = Vec::with_capacity(steps.len());
        let mut warnings = Vec::new();
        let mut failure = None;

        for (index, step) in steps.iter().enumerate() {
            info!("Step {}/{}: {}", index + 1, steps.len(), step.title());
            let prompt = step.build_prompt(insights, &outputs);

            match self.client.call(step.name(), &prompt).await {
                Ok(text) => {
                    let path = self.storage.write_step(step.output_file(), &text).await?;
                    outputs.insert(step.name(), text);
                    records.push(record(step, StepOutcome::Succeeded, path));
                }
                Err(err) => {
                    let message = err.kind.to_string();
                    let path = self.storage.write_error(step.name(), &message).await?;

                    if step.is_required() {
                        error!(step = step.name(), error = %message, "Required step failed, aborting pipeline");
                        records.push(record(step, StepOutcome::Aborted(message.clone()), path));
                        failure = Some(NarrativeError::new(NarrativeErrorKind::StepFailed {
                            step: step.name().to_string(),
                            message,
                        }));
                        break;
                    }

                    warn!(step = step.name(), error = %message, "Optional step failed, continuing without it");
                    warnings.push(format!("{} was skipped: {}", step.title(), message));
                    outputs.insert(step.name(), "");
                    records.push(record(step, StepOutcome::Degraded(message), path));
                }
            }
        }

        let final_document = combine_sections(
            steps
                .iter()
                .filter(|step| outputs.contains(step.name()))
                .map(|step| (step.title(), outputs.get(step.name()))),
        );

        let document_path = if failure.is_none() {
            let path = self
                .storage
                .write_document(&self.final_document, &final_document)
                .await?;
            info!(steps = records.len(), warnings = warnings.len(), "Pipeline completed");
            Some(path)
        } else {
            None
        };

        Ok(PipelineRun {
            records,
            outputs,
            warnings,
            final_document,
            document_path,
            failure,
        })
    }
}

fn record(step: &StepSpec, outcome: StepOutcome, path: PathBuf) -> StepRecord {
    StepRecord {
        name: step.name().to_string(),
        title: step.title().to_string(),
        required: step.is_required(),
        outcome,
        path,
    }
}
