//! Insight categories and the ordered insight collection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named buckets of insight strings.
///
/// Declaration order is the iteration order of [`Insights`], which keeps
/// extraction output deterministic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InsightCategory {
    /// Validation findings; always shown to readers first
    DataQuality,
    /// Headline marketplace metrics
    MarketplaceSummary,
    /// Supply-side (worker) metrics
    WorkerMetrics,
    /// Demand-side (workplace) metrics
    WorkplaceMetrics,
    /// Behavioural segments
    Segments,
    /// Time-of-day and lead-time patterns
    TimingPatterns,
    /// Price and rate response
    PriceSensitivity,
}

/// Mapping from category to an ordered list of insight strings.
///
/// Entries keep insertion order; earlier entries are shown first and survive
/// budget truncation longest.
///
/// # Examples
///
/// ```
/// use almanac_core::{InsightCategory, Insights};
///
/// let mut insights = Insights::new();
/// insights.push(InsightCategory::PriceSensitivity, "B");
/// insights.push(InsightCategory::PriceSensitivity, "B");
/// insights.push(InsightCategory::PriceSensitivity, "  ");
/// insights.push(InsightCategory::PriceSensitivity, "C");
/// insights.cleanup();
///
/// assert_eq!(insights.get(InsightCategory::PriceSensitivity), ["B", "C"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    categories: BTreeMap<InsightCategory, Vec<String>>,
}

impl Insights {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one insight to a category.
    pub fn push(&mut self, category: InsightCategory, insight: impl Into<String>) {
        self.categories.entry(category).or_default().push(insight.into());
    }

    /// Appends several insights to a category, in order.
    pub fn extend<I, S>(&mut self, category: InsightCategory, insights: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = self.categories.entry(category).or_default();
        entries.extend(insights.into_iter().map(Into::into));
    }

    /// Insights of a category; empty when the category was never filled.
    pub fn get(&self, category: InsightCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates non-empty categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (InsightCategory, &[String])> {
        self.categories
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(category, entries)| (*category, entries.as_slice()))
    }

    /// Total number of insights across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Whether no category holds any insight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops blank entries, then exact duplicates, keeping first occurrences.
    pub fn cleanup(&mut self) {
        for entries in self.categories.values_mut() {
            let mut seen = std::collections::HashSet::new();
            entries.retain(|entry| !entry.trim().is_empty() && seen.insert(entry.clone()));
        }
    }

    /// Builds a collection from string-keyed categories, ignoring unknown names.
    pub fn from_named<I, K, V>(named: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let mut insights = Self::new();
        for (name, entries) in named {
            match name.as_ref().parse::<InsightCategory>() {
                Ok(category) => insights.extend(category, entries),
                Err(_) => tracing::warn!(category = name.as_ref(), "Ignoring unknown insight category"),
            }
        }
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_dedups_and_preserves_order() {
        let mut insights = Insights::from_named([
            ("data_quality", vec!["A"]),
            ("price_sensitivity", vec!["B", "B", "C"]),
        ]);
        insights.cleanup();

        assert_eq!(insights.get(InsightCategory::DataQuality), ["A"]);
        assert_eq!(insights.get(InsightCategory::PriceSensitivity), ["B", "C"]);
    }

    #[test]
    fn test_cleanup_drops_whitespace_only_entries() {
        let mut insights = Insights::new();
        insights.extend(InsightCategory::Segments, ["", "   ", "\t", "Night owls"]);
        insights.cleanup();
        assert_eq!(insights.get(InsightCategory::Segments), ["Night owls"]);
    }

    #[test]
    fn test_data_quality_iterates_first() {
        let mut insights = Insights::new();
        insights.push(InsightCategory::PriceSensitivity, "late");
        insights.push(InsightCategory::DataQuality, "first");

        let first = insights.iter().next().map(|(category, _)| category);
        assert_eq!(first, Some(InsightCategory::DataQuality));
    }

    #[test]
    fn test_category_names_are_snake_case() {
        assert_eq!(InsightCategory::MarketplaceSummary.to_string(), "marketplace_summary");
        assert_eq!(
            "timing_patterns".parse::<InsightCategory>().ok(),
            Some(InsightCategory::TimingPatterns)
        );
    }
}
