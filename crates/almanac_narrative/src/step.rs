//! Pipeline step definitions.

use almanac_core::Insights;
use almanac_error::{NarrativeError, NarrativeErrorKind};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Outputs of the steps that have run so far, by step name.
///
/// A degraded optional step is present with an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutputs {
    outputs: HashMap<String, String>,
}

impl StepOutputs {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the output of a step.
    pub fn insert(&mut self, step: impl Into<String>, output: impl Into<String>) {
        self.outputs.insert(step.into(), output.into());
    }

    /// Output of a step, or `""` if it has not run.
    pub fn get(&self, step: &str) -> &str {
        self.outputs.get(step).map(String::as_str).unwrap_or_default()
    }

    /// Whether the step has recorded an output (possibly empty).
    pub fn contains(&self, step: &str) -> bool {
        self.outputs.contains_key(step)
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Assembles the prompt for one step.
///
/// Implementations must be pure: the same insights and outputs always give
/// the same prompt.
pub trait PromptBuilder: Send + Sync {
    /// Renders the prompt.
    fn build(&self, insights: &Insights, outputs: &StepOutputs) -> String;

    /// Names of the earlier steps this builder reads.
    fn upstream(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Adapts a closure into a [`PromptBuilder`].
pub struct FnPromptBuilder<F> {
    build: F,
    upstream: Vec<String>,
}

impl<F> FnPromptBuilder<F>
where
    F: Fn(&Insights, &StepOutputs) -> String + Send + Sync,
{
    /// Wraps `build`, declaring the steps it reads.
    pub fn new<I, S>(upstream: I, build: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            build,
            upstream: upstream.into_iter().map(Into::into).collect(),
        }
    }
}

impl<F> PromptBuilder for FnPromptBuilder<F>
where
    F: Fn(&Insights, &StepOutputs) -> String + Send + Sync,
{
    fn build(&self, insights: &Insights, outputs: &StepOutputs) -> String {
        (self.build)(insights, outputs)
    }

    fn upstream(&self) -> Vec<String> {
        self.upstream.clone()
    }
}

/// One node of the pipeline.
#[derive(Clone)]
pub struct StepSpec {
    name: String,
    title: String,
    required: bool,
    output_file: String,
    builder: Arc<dyn PromptBuilder>,
}

impl StepSpec {
    /// A step whose failure aborts the run. Output goes to `<name>.md`.
    pub fn required(
        name: impl Into<String>,
        title: impl Into<String>,
        builder: impl PromptBuilder + 'static,
    ) -> Self {
        Self::new(name, title, true, Arc::new(builder))
    }

    /// A step whose failure is recorded and skipped. Output goes to `<name>.md`.
    pub fn optional(
        name: impl Into<String>,
        title: impl Into<String>,
        builder: impl PromptBuilder + 'static,
    ) -> Self {
        Self::new(name, title, false, Arc::new(builder))
    }

    fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        required: bool,
        builder: Arc<dyn PromptBuilder>,
    ) -> Self {
        let name = name.into();
        Self {
            output_file: format!("{}.md", name),
            name,
            title: title.into(),
            required,
            builder,
        }
    }

    /// Unique step name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section title in the combined document.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether failure aborts the run.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// File name the raw output is written to.
    pub fn output_file(&self) -> &str {
        &self.output_file
    }

    /// Names of the earlier steps this step reads.
    pub fn upstream(&self) -> Vec<String> {
        self.builder.upstream()
    }

    /// Renders this step's prompt.
    pub fn build_prompt(&self, insights: &Insights, outputs: &StepOutputs) -> String {
        self.builder.build(insights, outputs)
    }
}

impl fmt::Debug for StepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSpec")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("required", &self.required)
            .field("output_file", &self.output_file)
            .field("upstream", &self.upstream())
            .finish()
    }
}

/// Checks that a step list forms a valid linear pipeline.
///
/// Names must be unique and every step may only read steps defined before it.
///
/// # Errors
///
/// [`NarrativeErrorKind::NoSteps`], [`NarrativeErrorKind::DuplicateStep`] or
/// [`NarrativeErrorKind::UnknownUpstream`].
pub fn validate_steps(steps: &[StepSpec]) -> Result<(), NarrativeError> {
    if steps.is_empty() {
        return Err(NarrativeError::new(NarrativeErrorKind::NoSteps));
    }
    let mut seen = HashSet::new();
    for step in steps {
        for upstream in step.upstream() {
            if !seen.contains(upstream.as_str()) {
                return Err(NarrativeError::new(NarrativeErrorKind::UnknownUpstream {
                    step: step.name.clone(),
                    upstream,
                }));
            }
        }
        if !seen.insert(step.name.as_str()) {
            return Err(NarrativeError::new(NarrativeErrorKind::DuplicateStep(
                step.name.clone(),
            )));
        }
    }
    Ok(())
}

/// Looks up a step by name.
///
/// # Errors
///
/// [`NarrativeErrorKind::UnknownStep`] if no step has that name.
pub fn find_step<'a>(steps: &'a [StepSpec], name: &str) -> Result<&'a StepSpec, NarrativeError> {
    steps
        .iter()
        .find(|step| step.name == name)
        .ok_or_else(|| NarrativeError::new(NarrativeErrorKind::UnknownStep(name.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, upstream: &[&str]) -> StepSpec {
        let upstream: Vec<String> = upstream.iter().map(|s| s.to_string()).collect();
        StepSpec::required(
            name,
            name.to_uppercase(),
            FnPromptBuilder::new(upstream, |_: &Insights, _: &StepOutputs| String::new()),
        )
    }

    #[test]
    fn test_output_file_defaults_to_name() {
        assert_eq!(step("market_structure", &[]).output_file(), "market_structure.md");
    }

    #[test]
    fn test_valid_chain() {
        let steps = [step("a", &[]), step("b", &["a"]), step("c", &["a", "b"])];
        assert!(validate_steps(&steps).is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        let err = validate_steps(&[]).unwrap_err();
        assert_eq!(err.kind, NarrativeErrorKind::NoSteps);
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = validate_steps(&[step("a", &[]), step("a", &[])]).unwrap_err();
        assert_eq!(err.kind, NarrativeErrorKind::DuplicateStep("a".to_string()));
    }

    #[test]
    fn test_rejects_forward_and_self_references() {
        let forward = validate_steps(&[step("a", &["b"]), step("b", &[])]).unwrap_err();
        assert!(matches!(forward.kind, NarrativeErrorKind::UnknownUpstream { .. }));

        let cycle = validate_steps(&[step("a", &["a"])]).unwrap_err();
        assert!(matches!(cycle.kind, NarrativeErrorKind::UnknownUpstream { .. }));
    }

    #[test]
    fn test_missing_output_reads_empty() {
        let outputs = StepOutputs::new();
        assert_eq!(outputs.get("anything"), "");
        assert!(!outputs.contains("anything"));
    }
}
