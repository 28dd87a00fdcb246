//! Declarative prompt templates.
//!
//! A template is static instruction text plus a description of which
//! variable content to splice in. Rendering always follows the same order:
//! header, data-quality insights, the template's insight sections, upstream
//! excerpts, footer.

use crate::step::{PromptBuilder, StepOutputs};
use almanac_core::{InsightCategory, Insights};
use derive_builder::Builder;
use derive_getters::Getters;

/// Appended to an upstream excerpt that was cut short.
pub const ELLIPSIS: &str = "...";

/// Cuts `text` to at most `cap` characters, appending [`ELLIPSIS`] only when
/// something was removed.
///
/// The cut is at a character boundary, not a word or sentence boundary.
///
/// # Examples
///
/// ```
/// use almanac_narrative::truncate_excerpt;
///
/// assert_eq!(truncate_excerpt("abcdef", 4), "abcd...");
/// assert_eq!(truncate_excerpt("abcd", 4), "abcd");
/// ```
pub fn truncate_excerpt(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// One block of insights from a single category.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct InsightSection {
    /// Category to read
    category: InsightCategory,
    /// Heading rendered above the bullets
    heading: String,
    /// Keep only entries containing one of these (case-insensitive); empty keeps all
    #[builder(default)]
    keywords: Vec<String>,
    /// Maximum number of entries shown
    #[builder(default)]
    limit: Option<usize>,
}

impl InsightSection {
    /// Creates a new builder for `InsightSection`.
    pub fn builder() -> InsightSectionBuilder {
        InsightSectionBuilder::default()
    }

    /// A section showing every entry of a category.
    pub fn all(category: InsightCategory, heading: impl Into<String>) -> Self {
        Self {
            category,
            heading: heading.into(),
            keywords: Vec::new(),
            limit: None,
        }
    }

    /// Returns a copy that keeps only entries mentioning one of `keywords`.
    pub fn matching<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        self
    }

    /// Returns a copy that shows at most `limit` entries.
    pub fn limited(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Entries of the category that pass the keyword filter and limit.
    pub fn select<'a>(&self, insights: &'a Insights) -> Vec<&'a str> {
        let matches = insights
            .get(self.category)
            .iter()
            .filter(|entry| {
                self.keywords.is_empty() || {
                    let lowered = entry.to_lowercase();
                    self.keywords.iter().any(|k| lowered.contains(k.as_str()))
                }
            })
            .map(String::as_str);
        match self.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        }
    }
}

/// A capped excerpt of an earlier step's output.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Excerpt {
    /// Name of the upstream step
    upstream: String,
    /// Heading rendered above the excerpt
    heading: String,
    /// Maximum characters kept
    cap: usize,
}

impl Excerpt {
    /// Creates an excerpt of `upstream` capped at `cap` characters.
    pub fn new(upstream: impl Into<String>, heading: impl Into<String>, cap: usize) -> Self {
        Self {
            upstream: upstream.into(),
            heading: heading.into(),
            cap,
        }
    }
}

/// Static instructions plus the variable content a step shows.
///
/// # Examples
///
/// ```
/// use almanac_core::{InsightCategory, Insights};
/// use almanac_narrative::{Excerpt, InsightSection, PromptBuilder, PromptTemplate, StepOutputs};
///
/// let template = PromptTemplate::builder()
///     .header("# Pricing\n")
///     .sections(vec![InsightSection::all(InsightCategory::PriceSensitivity, "Price Sensitivity")])
///     .excerpts(vec![Excerpt::new("market_structure", "Market Structure", 5)])
///     .footer("\n## Output Format\nMarkdown.")
///     .build()
///     .unwrap();
///
/// let mut insights = Insights::new();
/// insights.push(InsightCategory::PriceSensitivity, "Higher rates fill faster");
/// let mut outputs = StepOutputs::new();
/// outputs.insert("market_structure", "Concentrated supply");
///
/// let prompt = template.build(&insights, &outputs);
/// assert!(prompt.contains("- Higher rates fill faster"));
/// assert!(prompt.contains("Conce..."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct PromptTemplate {
    /// Role framing and task description
    header: String,
    /// Whether data-quality insights open the variable content
    #[builder(default)]
    data_quality: bool,
    /// Line introducing the insight sections
    #[builder(default)]
    insights_heading: Option<String>,
    /// Category blocks, in render order
    #[builder(default)]
    sections: Vec<InsightSection>,
    /// Line introducing the upstream excerpts
    #[builder(default)]
    excerpts_heading: Option<String>,
    /// Upstream excerpts, in render order
    #[builder(default)]
    excerpts: Vec<Excerpt>,
    /// Analysis framework and required output format
    #[builder(default)]
    footer: String,
}

impl PromptTemplate {
    /// Creates a new builder for `PromptTemplate`.
    pub fn builder() -> PromptTemplateBuilder {
        PromptTemplateBuilder::default()
    }

    /// A template with only static text.
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            data_quality: false,
            insights_heading: None,
            sections: Vec::new(),
            excerpts_heading: None,
            excerpts: Vec::new(),
            footer: footer.into(),
        }
    }

    /// Opens the variable content with the data-quality insights.
    pub fn with_data_quality(mut self) -> Self {
        self.data_quality = true;
        self
    }

    /// Sets the insight sections and the line introducing them.
    pub fn with_insights(mut self, heading: impl Into<String>, sections: Vec<InsightSection>) -> Self {
        self.insights_heading = Some(heading.into());
        self.sections = sections;
        self
    }

    /// Sets the upstream excerpts and the line introducing them.
    pub fn with_excerpts(mut self, heading: impl Into<String>, excerpts: Vec<Excerpt>) -> Self {
        self.excerpts_heading = Some(heading.into());
        self.excerpts = excerpts;
        self
    }

    fn render_insights(&self, insights: &Insights, prompt: &mut String) {
        let mut blocks: Vec<(&str, Vec<&str>)> = Vec::new();
        if self.data_quality {
            let entries: Vec<&str> = insights
                .get(InsightCategory::DataQuality)
                .iter()
                .map(String::as_str)
                .collect();
            blocks.push(("Data Quality and Validation", entries));
        }
        for section in &self.sections {
            blocks.push((section.heading.as_str(), section.select(insights)));
        }
        blocks.retain(|(_, entries)| !entries.is_empty());
        if blocks.is_empty() {
            return;
        }

        if let Some(heading) = &self.insights_heading {
            prompt.push_str("\n\n");
            prompt.push_str(heading);
            prompt.push('\n');
        }
        for (heading, entries) in blocks {
            prompt.push_str("\n### ");
            prompt.push_str(heading);
            prompt.push('\n');
            for entry in entries {
                prompt.push_str("- ");
                prompt.push_str(entry);
                prompt.push('\n');
            }
        }
    }

    fn render_excerpts(&self, outputs: &StepOutputs, prompt: &mut String) {
        if self.excerpts.is_empty() {
            return;
        }
        if let Some(heading) = &self.excerpts_heading {
            prompt.push_str("\n\n");
            prompt.push_str(heading);
            prompt.push('\n');
        }
        for excerpt in &self.excerpts {
            prompt.push_str("\n### ");
            prompt.push_str(&excerpt.heading);
            prompt.push('\n');
            prompt.push_str(&truncate_excerpt(outputs.get(&excerpt.upstream), excerpt.cap));
            prompt.push('\n');
        }
    }
}

impl PromptBuilder for PromptTemplate {
    fn build(&self, insights: &Insights, outputs: &StepOutputs) -> String {
        let mut prompt = self.header.clone();
        self.render_insights(insights, &mut prompt);
        self.render_excerpts(outputs, &mut prompt);
        prompt.push_str(&self.footer);
        prompt
    }

    fn upstream(&self) -> Vec<String> {
        self.excerpts.iter().map(|e| e.upstream.clone()).collect()
    }
}
