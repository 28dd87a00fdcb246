//! Prompt budget configuration and the token budget reducer.
//!
//! The reducer is a greedy, priority-based lossy compression of a prompt. It
//! classifies every line into a [`PromptSection`], reassembles the sections in
//! priority order with per-section caps, and hard-truncates whatever is still
//! over the character budget. The instruction section is always kept in full
//! before anything else is considered.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker appended when a prompt is hard-truncated.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated to fit token limits]";

/// Roughly four characters per token for English prose.
const CHARS_PER_TOKEN: usize = 4;

/// Approximate token count of a text.
///
/// # Examples
///
/// ```
/// use almanac_core::estimate_tokens;
///
/// assert_eq!(estimate_tokens("abcdefgh"), 2);
/// assert_eq!(estimate_tokens(""), 0);
/// ```
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Character and token ceilings applied to prompts.
///
/// # Examples
///
/// ```
/// use almanac_core::BudgetConfig;
///
/// let budget = BudgetConfig::default();
/// assert_eq!(*budget.aggressive_target_chars(), 30_000);
/// assert_eq!(budget.target_limit(false), 50_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Token estimate above which a prompt is reduced before the first send
    #[serde(default = "default_preemptive_threshold")]
    preemptive_reduction_threshold: usize,

    /// Character ceiling for aggressive reduction
    #[serde(default = "default_aggressive_target")]
    aggressive_target_chars: usize,

    /// Character ceiling for normal reduction
    #[serde(default = "default_normal_target")]
    normal_target_chars: usize,
}

fn default_preemptive_threshold() -> usize {
    8_000
}

fn default_aggressive_target() -> usize {
    30_000
}

fn default_normal_target() -> usize {
    50_000
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            preemptive_reduction_threshold: default_preemptive_threshold(),
            aggressive_target_chars: default_aggressive_target(),
            normal_target_chars: default_normal_target(),
        }
    }
}

impl BudgetConfig {
    /// Creates a budget from explicit values.
    pub fn new(
        preemptive_reduction_threshold: usize,
        aggressive_target_chars: usize,
        normal_target_chars: usize,
    ) -> Self {
        Self {
            preemptive_reduction_threshold,
            aggressive_target_chars,
            normal_target_chars,
        }
    }

    /// Character ceiling for the given reduction mode.
    pub fn target_limit(&self, aggressive: bool) -> usize {
        if aggressive {
            self.aggressive_target_chars
        } else {
            self.normal_target_chars
        }
    }

    /// Validates that the aggressive ceiling is the tighter one and leaves
    /// room for the truncation marker.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        let marker = TRUNCATION_MARKER.chars().count();
        if self.aggressive_target_chars <= marker {
            return Err(format!(
                "aggressive_target_chars must exceed {} characters, got {}",
                marker, self.aggressive_target_chars
            ));
        }
        if self.aggressive_target_chars > self.normal_target_chars {
            return Err(format!(
                "aggressive_target_chars ({}) must not exceed normal_target_chars ({})",
                self.aggressive_target_chars, self.normal_target_chars
            ));
        }
        Ok(())
    }
}

/// Semantic sections a prompt line can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PromptSection {
    /// Data and table headers
    Tables,
    /// Enumerated requirements and bullet lists
    Questions,
    /// Worked examples
    Examples,
    /// Role framing, task description and output format (default)
    Instructions,
    /// Raw sample rows
    Data,
}

impl PromptSection {
    /// Section a line opens, if it carries a marker.
    ///
    /// Markers are checked in priority order: tables, questions, examples,
    /// instructions, data.
    pub fn from_marker(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if line.contains("## Table") || line.contains("## Available Data") {
            Some(PromptSection::Tables)
        } else if line.contains("## Question")
            || trimmed.starts_with("1. ")
            || trimmed.starts_with("- ")
        {
            Some(PromptSection::Questions)
        } else if line.contains("## Example") {
            Some(PromptSection::Examples)
        } else if line.contains("## Output") || line.contains("## Format") {
            Some(PromptSection::Instructions)
        } else if line.contains("Sample data") || line.contains("Row ") {
            Some(PromptSection::Data)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
struct ClassifiedPrompt<'a> {
    tables: Vec<&'a str>,
    questions: Vec<&'a str>,
    examples: Vec<&'a str>,
    instructions: Vec<&'a str>,
    data: Vec<&'a str>,
}

impl<'a> ClassifiedPrompt<'a> {
    fn classify(prompt: &'a str) -> Self {
        let mut classified = Self::default();
        let mut current = PromptSection::Instructions;
        for line in prompt.split('\n') {
            if let Some(section) = PromptSection::from_marker(line) {
                current = section;
            }
            classified.section_mut(current).push(line);
        }
        classified
    }

    fn section_mut(&mut self, section: PromptSection) -> &mut Vec<&'a str> {
        match section {
            PromptSection::Tables => &mut self.tables,
            PromptSection::Questions => &mut self.questions,
            PromptSection::Examples => &mut self.examples,
            PromptSection::Instructions => &mut self.instructions,
            PromptSection::Data => &mut self.data,
        }
    }
}

/// Rewrites oversized prompts to fit a character budget.
///
/// # Examples
///
/// ```
/// use almanac_core::{BudgetConfig, TokenBudgetReducer, TRUNCATION_MARKER};
///
/// let reducer = TokenBudgetReducer::new(BudgetConfig::default());
/// let huge = "x".repeat(200_000);
/// let reduced = reducer.reduce(&huge, false);
///
/// assert!(reduced.chars().count() <= 50_000);
/// assert!(reduced.ends_with(TRUNCATION_MARKER.trim_start()));
/// ```
#[derive(Debug, Clone, Copy, Default, derive_getters::Getters)]
pub struct TokenBudgetReducer {
    /// Ceilings used by this reducer
    budget: BudgetConfig,
}

impl TokenBudgetReducer {
    /// Aggressive mode keeps at most this many question lines.
    const AGGRESSIVE_QUESTION_LIMIT: usize = 5;
    /// Aggressive mode keeps at most this many table lines.
    const AGGRESSIVE_TABLE_LIMIT: usize = 5;
    /// Normal mode keeps at most this many table lines.
    const NORMAL_TABLE_LIMIT: usize = 10;
    /// Normal mode keeps at most this many sample row lines.
    const NORMAL_ROW_LIMIT: usize = 2;

    /// Creates a reducer with the given ceilings.
    pub fn new(budget: BudgetConfig) -> Self {
        Self { budget }
    }

    /// Character ceiling for the given mode.
    pub fn target_limit(&self, aggressive: bool) -> usize {
        self.budget.target_limit(aggressive)
    }

    /// Whether a prompt's token estimate calls for reduction before sending.
    pub fn needs_preemptive_reduction(&self, prompt: &str) -> bool {
        estimate_tokens(prompt) > self.budget.preemptive_reduction_threshold
    }

    /// Reduces a prompt so that its character count never exceeds
    /// [`target_limit`](Self::target_limit).
    ///
    /// Prompts already within the limit are returned unchanged.
    #[tracing::instrument(skip(self, prompt), fields(input_chars = prompt.len()))]
    pub fn reduce(&self, prompt: &str, aggressive: bool) -> String {
        let limit = self.target_limit(aggressive);
        if prompt.chars().count() <= limit {
            return prompt.to_string();
        }

        let sections = ClassifiedPrompt::classify(prompt);
        let mut kept: Vec<&str> = Vec::with_capacity(prompt.len() / 40);

        kept.extend(&sections.instructions);

        if aggressive {
            kept.extend(sections.questions.iter().take(Self::AGGRESSIVE_QUESTION_LIMIT));
        } else {
            kept.extend(&sections.questions);
        }

        let table_limit = if aggressive {
            Self::AGGRESSIVE_TABLE_LIMIT
        } else {
            Self::NORMAL_TABLE_LIMIT
        };
        kept.extend(sections.tables.iter().take(table_limit));

        kept.extend(Self::sample_lines(&sections.data, aggressive));

        let reassembled = kept.join("\n");
        debug!(
            instructions = sections.instructions.len(),
            questions = sections.questions.len(),
            tables = sections.tables.len(),
            examples_dropped = sections.examples.len(),
            data = sections.data.len(),
            reassembled_chars = reassembled.len(),
            "Reassembled prompt by section priority"
        );

        Self::truncate(reassembled, limit)
    }

    /// Data lines to keep.
    ///
    /// Normal mode keeps every non-row line and the first two row lines.
    /// Aggressive mode keeps only header lines and the first row line, which
    /// is always a subset of what normal mode keeps.
    fn sample_lines<'a>(data: &[&'a str], aggressive: bool) -> Vec<&'a str> {
        let mut rows_seen = 0usize;
        let mut kept = Vec::new();
        for line in data {
            let is_row = line.contains("Row ");
            if is_row {
                rows_seen += 1;
            }
            let keep = if aggressive {
                if is_row {
                    rows_seen == 1
                } else {
                    line.contains("Sample data") || line.contains("Columns")
                }
            } else {
                !is_row || rows_seen <= Self::NORMAL_ROW_LIMIT
            };
            if keep {
                kept.push(*line);
            }
        }
        kept
    }

    /// Cuts text at the character limit, reserving room for the marker.
    fn truncate(text: String, limit: usize) -> String {
        let length = text.chars().count();
        if length <= limit {
            return text;
        }
        let marker = TRUNCATION_MARKER.chars().count();
        if limit <= marker {
            // No room for the marker; a bare cut still honours the limit.
            return text.chars().take(limit).collect();
        }
        let keep = limit - marker;
        let mut truncated: String = text.chars().take(keep).collect();
        truncated.push_str(TRUNCATION_MARKER);
        debug!(from = length, to = truncated.chars().count(), "Hard-truncated prompt");
        truncated
    }
}
