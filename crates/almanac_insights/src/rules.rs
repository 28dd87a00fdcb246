//! Per-table extraction rules.
//!
//! Every table first goes through the validation passes, which look at column
//! shapes regardless of the table name. Then exactly one [`TableRule`] is
//! chosen by name, falling back to a generic column scan.

use crate::numeric::{
    arg_max, arg_min, is_truthy, mean, missing_column, numbers, parse_number, percent, sum,
    top_fifth_share,
};
use almanac_core::{InsightCategory, Insights, Table};
use almanac_error::{ExtractionError, ExtractionErrorKind};
use std::collections::{BTreeMap, BTreeSet};

/// Insights and validation findings produced by one table.
#[derive(Debug, Default)]
pub(crate) struct TableFindings {
    pub(crate) insights: Insights,
    pub(crate) validations: Vec<String>,
}

impl TableFindings {
    fn push(&mut self, category: InsightCategory, insight: impl Into<String>) {
        self.insights.push(category, insight);
    }

    fn validate(&mut self, finding: impl Into<String>) {
        self.validations.push(finding.into());
    }
}

/// Which side of the marketplace a table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Worker,
    Workplace,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Worker => "Worker",
            Side::Workplace => "Workplace",
        }
    }
}

/// Recognised table conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableRule {
    KeyMetrics,
    WorkerAggregates,
    WorkplaceAggregates,
    BehaviorSegments(Side),
    Concentration(Side),
    ShiftTiming { hourly: bool },
    DynamicPricing,
    RateChangeImpact,
    Retention,
    FirstClaim,
    CancellationTiming,
    ProblematicWorkplaces,
    Generic,
}

impl TableRule {
    pub(crate) fn for_table(name: &str) -> Self {
        match name {
            "key_metrics" => TableRule::KeyMetrics,
            "worker_aggregates" => TableRule::WorkerAggregates,
            "workplace_aggregates" => TableRule::WorkplaceAggregates,
            "worker_behavior_segments" => TableRule::BehaviorSegments(Side::Worker),
            "workplace_behavior_segments" => TableRule::BehaviorSegments(Side::Workplace),
            "worker_concentration_metrics" => TableRule::Concentration(Side::Worker),
            "workplace_concentration_metrics" => TableRule::Concentration(Side::Workplace),
            "hourly_shift_metrics" => TableRule::ShiftTiming { hourly: true },
            "daily_shift_metrics" => TableRule::ShiftTiming { hourly: false },
            "dynamic_pricing_time_effect" => TableRule::DynamicPricing,
            "rate_change_impact" => TableRule::RateChangeImpact,
            _ if name.to_lowercase().contains("retention") => TableRule::Retention,
            "first_claim_metrics" => TableRule::FirstClaim,
            "cancellation_timing" => TableRule::CancellationTiming,
            "problematic_workplaces" => TableRule::ProblematicWorkplaces,
            _ => TableRule::Generic,
        }
    }
}

/// Runs the validation passes and the table's rule.
pub(crate) fn process(table: &Table) -> Result<TableFindings, ExtractionError> {
    let mut findings = TableFindings::default();

    validate_shift_aggregation(table, &mut findings)?;
    validate_churn_window(table, &mut findings)?;
    validate_duplicate_offers(table, &mut findings)?;

    match TableRule::for_table(table.name()) {
        TableRule::KeyMetrics => key_metrics(table, &mut findings),
        TableRule::WorkerAggregates => worker_aggregates(table, &mut findings)?,
        TableRule::WorkplaceAggregates => workplace_aggregates(table, &mut findings)?,
        TableRule::BehaviorSegments(side) => behavior_segments(table, side, &mut findings),
        TableRule::Concentration(side) => concentration(table, side, &mut findings)?,
        TableRule::ShiftTiming { hourly } => shift_timing(table, hourly, &mut findings)?,
        TableRule::DynamicPricing => dynamic_pricing(table, &mut findings)?,
        TableRule::RateChangeImpact => rate_change_impact(table, &mut findings)?,
        TableRule::Retention => retention(table, &mut findings)?,
        TableRule::FirstClaim => first_claim(table, &mut findings)?,
        TableRule::CancellationTiming => cancellation_timing(table, &mut findings)?,
        TableRule::ProblematicWorkplaces => findings.push(
            InsightCategory::WorkplaceMetrics,
            format!("Found {} problematic workplaces with low fill rates", table.len()),
        ),
        TableRule::Generic => generic_scan(table, &mut findings),
    }

    Ok(findings)
}

fn text_column<'a>(table: &'a Table, column: &str) -> Result<Vec<Option<&'a str>>, ExtractionError> {
    table
        .column(column)
        .ok_or_else(|| missing_column(table, column))
}

fn first_present<'a>(table: &'a Table, row: usize, columns: &[&str]) -> &'a str {
    columns
        .iter()
        .find(|column| table.has_column(column))
        .and_then(|column| table.cell(row, column))
        .unwrap_or("Unknown")
}

fn empty_table(table: &Table) -> ExtractionError {
    ExtractionError::new(ExtractionErrorKind::EmptyTable(table.name().clone()))
}

/// Raw offer rows are aggregated to one record per shift before computing
/// fill and completion rates.
fn validate_shift_aggregation(
    table: &Table,
    findings: &mut TableFindings,
) -> Result<(), ExtractionError> {
    if !table.has_column("shift_id")
        || !(table.has_column("claimed_at") || table.has_column("is_verified"))
    {
        return Ok(());
    }

    let shift_ids = text_column(table, "shift_id")?;
    let unique_shifts: BTreeSet<&str> = shift_ids.iter().flatten().copied().collect();
    if unique_shifts.len() >= table.len() {
        return Ok(());
    }

    findings.validate(format!(
        "Found {} offers for {} unique shifts",
        table.len(),
        unique_shifts.len()
    ));

    if table.has_column("worker_id") {
        let worker_ids = text_column(table, "worker_id")?;
        let mut workers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (shift, worker) in shift_ids.iter().zip(&worker_ids) {
            if let (Some(shift), Some(worker)) = (shift, worker) {
                workers.entry(*shift).or_default().insert(*worker);
            }
        }
        let multi_worker = workers.values().filter(|w| w.len() > 1).count();
        if multi_worker > 0 {
            findings.validate(format!(
                "Confirmed {} shifts with multiple workers",
                multi_worker
            ));
            findings.push(
                InsightCategory::DataQuality,
                format!(
                    "Multiple workers can be assigned to the same shift ({} examples found)",
                    multi_worker
                ),
            );
        }
    }

    let claimed = text_column(table, "claimed_at")?;
    let verified = text_column(table, "is_verified")?;
    let rates = numbers(table, "rate")?;

    #[derive(Default)]
    struct ShiftRecord {
        claimed: bool,
        verified: bool,
        min_rate: Option<f64>,
        max_rate: Option<f64>,
    }

    let mut shifts: BTreeMap<&str, ShiftRecord> = BTreeMap::new();
    for (row, shift) in shift_ids.iter().enumerate() {
        let Some(shift) = shift else { continue };
        let record = shifts.entry(*shift).or_default();
        record.claimed |= claimed[row].is_some();
        record.verified |= is_truthy(verified[row]);
        if let Some(rate) = rates[row] {
            record.min_rate = Some(record.min_rate.map_or(rate, |m| m.min(rate)));
            record.max_rate = Some(record.max_rate.map_or(rate, |m| m.max(rate)));
        }
    }

    if shifts.is_empty() {
        return Ok(());
    }

    let total = shifts.len();
    let filled = shifts.values().filter(|s| s.claimed).count();
    let completed = shifts.values().filter(|s| s.verified).count();
    let fill_rate = filled as f64 / total as f64;
    let completion_rate = if filled > 0 {
        completed as f64 / filled as f64
    } else {
        0.0
    };

    findings.push(
        InsightCategory::MarketplaceSummary,
        format!(
            "Shift-level metrics (properly aggregated): {}/{} shifts filled ({})",
            filled,
            total,
            percent(fill_rate)
        ),
    );
    findings.push(
        InsightCategory::MarketplaceSummary,
        format!("Shift completion rate: {}", percent(completion_rate)),
    );

    let changes: Vec<f64> = shifts
        .values()
        .filter_map(|s| Some(s.max_rate? - s.min_rate?))
        .filter(|change| *change > 0.0)
        .collect();
    if !changes.is_empty() {
        let average = changes.iter().sum::<f64>() / changes.len() as f64;
        findings.push(
            InsightCategory::PriceSensitivity,
            format!(
                "Dynamic pricing detected in {} shifts ({}) with average change of ${:.2}",
                changes.len(),
                percent(changes.len() as f64 / total as f64),
                average
            ),
        );
        findings.validate(format!(
            "Validated real price changes in {} shifts",
            changes.len()
        ));
    }

    Ok(())
}

/// Churn and retention tables should carry a 30-day window.
fn validate_churn_window(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    let lowered = table.name().to_lowercase();
    if !(lowered.contains("churn") || lowered.contains("retention")) || !table.has_column("days") {
        return Ok(());
    }

    let days = numbers(table, "days")?;
    match days.iter().position(|d| *d == Some(30.0)) {
        Some(row) => {
            let value = if table.has_column("retention_rate") {
                table.cell(row, "retention_rate").unwrap_or("nan")
            } else {
                "present"
            };
            findings.validate(format!("Confirmed 30-day churn/retention metric: {}", value));
        }
        None => {
            findings.validate("WARNING: 30-day churn/retention period not found in data");
            findings.push(
                InsightCategory::DataQuality,
                "Churn definition does not appear to use standard 30-day period",
            );
        }
    }
    Ok(())
}

/// Several offers for the same shift and worker should reflect real price
/// changes rather than repeated system records.
fn validate_duplicate_offers(
    table: &Table,
    findings: &mut TableFindings,
) -> Result<(), ExtractionError> {
    if !(table.has_column("shift_id") && table.has_column("worker_id") && table.has_column("rate")) {
        return Ok(());
    }

    let shift_ids = text_column(table, "shift_id")?;
    let worker_ids = text_column(table, "worker_id")?;
    let rates = text_column(table, "rate")?;

    let mut groups: BTreeMap<(Option<&str>, Option<&str>), Vec<Option<&str>>> = BTreeMap::new();
    for row in 0..table.len() {
        groups
            .entry((shift_ids[row], worker_ids[row]))
            .or_default()
            .push(rates[row]);
    }

    let duplicates: Vec<&Vec<Option<&str>>> = groups.values().filter(|g| g.len() > 1).collect();
    if duplicates.is_empty() {
        return Ok(());
    }

    let duplicate_rows: usize = duplicates.iter().map(|g| g.len()).sum();
    let with_price_changes: usize = duplicates
        .iter()
        .filter(|g| g.iter().flatten().collect::<BTreeSet<_>>().len() > 1)
        .map(|g| g.len())
        .sum();
    let system_duplicates = duplicate_rows - with_price_changes;

    if with_price_changes > 0 {
        findings.push(
            InsightCategory::PriceSensitivity,
            format!(
                "Found {} offers with real price changes visible to workers",
                with_price_changes
            ),
        );
    }
    if system_duplicates > 0 {
        findings.validate(format!(
            "WARNING: Found {} duplicate offers with identical rates (potential system artifacts)",
            system_duplicates
        ));
        findings.push(
            InsightCategory::DataQuality,
            format!(
                "Data quality issue: {} duplicate offers have identical rates",
                system_duplicates
            ),
        );
    }
    Ok(())
}

fn key_metrics(table: &Table, findings: &mut TableFindings) {
    if !(table.has_column("category") && table.has_column("metric")) {
        return;
    }
    for row in 0..table.len() {
        let category = table.cell(row, "category").unwrap_or("Uncategorized");
        let metric = table.cell(row, "metric").unwrap_or("Unknown metric");
        let value = table
            .cell(row, "formatted_value")
            .or_else(|| table.cell(row, "value"))
            .unwrap_or("N/A");
        findings.push(
            InsightCategory::MarketplaceSummary,
            format!("{} - {}: {}", category, metric, value),
        );
    }
}

fn average_rate_lines(
    table: &Table,
    columns: &[(&str, &str)],
) -> Result<Vec<String>, ExtractionError> {
    let mut lines = Vec::new();
    for (column, label) in columns {
        if !table.has_column(column) {
            continue;
        }
        if let Some(average) = mean(&numbers(table, column)?) {
            lines.push(format!("Average {}: {}", label, percent(average)));
        }
    }
    Ok(lines)
}

fn worker_aggregates(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    findings.push(
        InsightCategory::WorkerMetrics,
        format!("Total workers: {}", table.len()),
    );
    findings.insights.extend(
        InsightCategory::WorkerMetrics,
        average_rate_lines(
            table,
            &[
                ("claim_rate", "claim rate"),
                ("completion_rate", "completion rate"),
                ("cancellation_rate", "cancellation rate"),
            ],
        )?,
    );

    if let Some(window) = table.cell(0, "churn_window_days") {
        let days = parse_number(window).ok_or_else(|| {
            ExtractionError::new(ExtractionErrorKind::InvalidNumber {
                table: table.name().clone(),
                column: "churn_window_days".to_string(),
                value: window.to_string(),
            })
        })?;
        if days == 30.0 {
            findings.validate("Confirmed worker churn uses 30-day definition");
        } else if days != 0.0 {
            findings.validate(format!(
                "WARNING: Worker churn uses {}-day definition, not the standard 30-day",
                window
            ));
            findings.push(
                InsightCategory::DataQuality,
                format!(
                    "Non-standard churn definition: {} days (standard is 30 days)",
                    window
                ),
            );
        }
    }

    if table.has_column("views") && table.has_column("claims") {
        if let Some(share) = top_fifth_share(&numbers(table, "claims")?) {
            findings.push(
                InsightCategory::WorkerMetrics,
                format!("Top 20% of workers account for {} of all claims", percent(share)),
            );
        }
    }
    Ok(())
}

fn workplace_aggregates(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    findings.push(
        InsightCategory::WorkplaceMetrics,
        format!("Total workplaces: {}", table.len()),
    );
    findings.insights.extend(
        InsightCategory::WorkplaceMetrics,
        average_rate_lines(
            table,
            &[
                ("fill_rate", "fill rate"),
                ("claim_rate", "claim rate"),
                ("cancellation_rate", "cancellation rate"),
            ],
        )?,
    );

    if table.has_column("fill_rate")
        && table.has_column("shifts_posted")
        && table.has_column("shifts_filled")
    {
        let posted = sum(&numbers(table, "shifts_posted")?);
        let filled = sum(&numbers(table, "shifts_filled")?);
        let calculated = if posted > 0.0 { filled / posted } else { 0.0 };
        if let Some(reported) = mean(&numbers(table, "fill_rate")?) {
            if (calculated - reported).abs() > 0.01 {
                findings.validate(format!(
                    "WARNING: Possible fill rate calculation issue. Shift-based: {} vs. Reported: {}",
                    percent(calculated),
                    percent(reported)
                ));
                findings.push(
                    InsightCategory::DataQuality,
                    format!("Fill rate calculation validated: shift-based {}", percent(calculated)),
                );
            }
        }
    }

    if table.has_column("shifts_posted") {
        if let Some(share) = top_fifth_share(&numbers(table, "shifts_posted")?) {
            findings.push(
                InsightCategory::WorkplaceMetrics,
                format!("Top 20% of workplaces account for {} of all shifts", percent(share)),
            );
        }
    }
    Ok(())
}

fn describe_row(table: &Table, row: usize, skip: &[&str]) -> String {
    table
        .columns()
        .iter()
        .filter(|column| !skip.contains(&column.as_str()))
        .filter_map(|column| table.cell(row, column).map(|value| format!("{}: {}", column, value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn behavior_segments(table: &Table, side: Side, findings: &mut TableFindings) {
    if !table.has_column("segment_name") {
        return;
    }
    for row in 0..table.len() {
        let name = table.cell(row, "segment_name").unwrap_or("Unknown");
        let details = describe_row(table, row, &["segment_name", "cluster"]);
        let line = format!("{} segment: {} - {}", side.label(), name, details);
        findings.push(
            InsightCategory::Segments,
            line.trim_end_matches([',', ' ', '-']).to_string(),
        );
    }
}

fn concentration(table: &Table, side: Side, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    let entity = match side {
        Side::Worker => "Workers",
        Side::Workplace => "Workplaces",
    };
    let pct_columns: Vec<&String> = table
        .columns()
        .iter()
        .filter(|column| column.to_lowercase().contains("pct"))
        .collect();
    let pct_values = pct_columns
        .iter()
        .map(|column| numbers(table, column))
        .collect::<Result<Vec<_>, _>>()?;

    for row in 0..table.len() {
        let bucket = first_present(table, row, &["worker_bucket", "workplace_bucket"]);
        let metrics: Vec<String> = pct_columns
            .iter()
            .zip(&pct_values)
            .filter_map(|(column, values)| values[row].map(|v| format!("{}: {:.2}%", column, v)))
            .collect();
        let line = format!("{} concentration - {}: {}", entity, bucket, metrics.join(", "));
        findings.push(
            InsightCategory::MarketplaceSummary,
            line.trim_end_matches([',', ' ']).to_string(),
        );
    }
    Ok(())
}

fn shift_timing(table: &Table, hourly: bool, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    if !table.has_column("claim_rate") {
        return Ok(());
    }
    let unit = if hourly { "hour" } else { "day" };
    let rates = numbers(table, "claim_rate")?;
    let (Some(best), Some(worst)) = (arg_max(&rates), arg_min(&rates)) else {
        return Err(empty_table(table));
    };

    for (label, row) in [("Best", best), ("Worst", worst)] {
        let when = first_present(table, row, &["view_hour", "day_name"]);
        let rate = rates[row].unwrap_or_default();
        findings.push(
            InsightCategory::TimingPatterns,
            format!(
                "{} {} for claims: {} (claim rate: {})",
                label,
                unit,
                when,
                percent(rate)
            ),
        );
    }
    Ok(())
}

fn dynamic_pricing(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    if !(table.has_column("hours_to_start") && table.has_column("avg_rate")) {
        return Ok(());
    }

    if let Some(column) = ["num_shifts", "shift_count"]
        .into_iter()
        .find(|column| table.has_column(column))
    {
        let total = sum(&numbers(table, column)?);
        findings.validate(format!("Dynamic pricing analysis based on {} shifts", total));
    }

    if table.is_empty() {
        return Err(empty_table(table));
    }
    let last = table.len() - 1;
    let rates = numbers(table, "avg_rate")?;
    let earliest = rates[0].unwrap_or_default();
    let latest = rates[last].unwrap_or_default();
    let change = if earliest > 0.0 {
        (latest - earliest) / earliest
    } else {
        0.0
    };

    findings.push(
        InsightCategory::PriceSensitivity,
        format!(
            "Dynamic pricing effect: Rates change by {} from {} to {} before shift start",
            percent(change),
            table.cell(0, "hours_to_start").unwrap_or("Unknown"),
            table.cell(last, "hours_to_start").unwrap_or("Unknown"),
        ),
    );
    Ok(())
}

fn rate_change_impact(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    if !(table.has_column("rate_change") && table.has_column("claim_rate")) {
        return Ok(());
    }
    let rates = numbers(table, "claim_rate")?;
    for (row, rate) in rates.iter().enumerate() {
        let Some(rate) = rate else { continue };
        findings.push(
            InsightCategory::PriceSensitivity,
            format!(
                "Rate change '{}' leads to claim rate: {}",
                table.cell(row, "rate_change").unwrap_or("Unknown"),
                percent(*rate)
            ),
        );
    }
    Ok(())
}

fn is_thirty_day(period: &str) -> bool {
    let lowered = period.to_lowercase();
    parse_number(period) == Some(30.0) || lowered == "30 days" || lowered == "30-day"
}

fn retention(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    if !table.has_column("retention_rate") {
        return Ok(());
    }
    let average = mean(&numbers(table, "retention_rate")?).unwrap_or_default();
    let mut line = format!(
        "Retention metrics from {}: Average retention rate: {}",
        table.name(),
        percent(average)
    );

    if table.has_column("period") {
        let has_thirty_day = text_column(table, "period")?
            .into_iter()
            .flatten()
            .any(is_thirty_day);
        line.push_str(&format!(
            " (30-day standard: {})",
            if has_thirty_day { "Yes" } else { "No" }
        ));
        if !has_thirty_day {
            findings.validate("WARNING: Retention analysis not using 30-day standard period");
        }
    }

    findings.push(InsightCategory::MarketplaceSummary, line);
    Ok(())
}

fn first_claim(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    let metrics = text_column(table, "metric")?;
    let values = text_column(table, "value")?;
    for (metric, value) in metrics.into_iter().zip(values) {
        findings.push(
            InsightCategory::WorkerMetrics,
            format!("{}: {}", metric.unwrap_or("nan"), value.unwrap_or("nan")),
        );
    }
    Ok(())
}

fn cancellation_timing(table: &Table, findings: &mut TableFindings) -> Result<(), ExtractionError> {
    if !(table.has_column("time_before_shift") && table.has_column("percentage")) {
        return Ok(());
    }
    let shares = numbers(table, "percentage")?;
    let row = arg_max(&shares).ok_or_else(|| empty_table(table))?;
    findings.push(
        InsightCategory::TimingPatterns,
        format!(
            "Most common cancellation time: {} ({:.2}%)",
            table.cell(row, "time_before_shift").unwrap_or("Unknown"),
            shares[row].unwrap_or_default()
        ),
    );
    Ok(())
}

/// Opportunistic extraction for tables without a dedicated rule: averages of
/// `rate`/`pct` columns and one entry per `segment_name` row.
fn generic_scan(table: &Table, findings: &mut TableFindings) {
    for column in table.columns() {
        let lowered = column.to_lowercase();
        let is_pct = lowered.contains("pct");
        if !(is_pct || lowered.contains("rate")) {
            continue;
        }
        // Columns that are not purely numeric are skipped.
        let Ok(values) = numbers(table, column) else {
            continue;
        };
        let Some(average) = mean(&values) else {
            continue;
        };
        let rendered = if is_pct {
            format!("{:.2}%", average)
        } else {
            percent(average)
        };
        findings.push(
            InsightCategory::MarketplaceSummary,
            format!("{}: average {} {}", table.name(), column, rendered),
        );
    }

    if table.has_column("segment_name") {
        for row in 0..table.len() {
            let Some(name) = table.cell(row, "segment_name") else {
                continue;
            };
            let details = describe_row(table, row, &["segment_name", "cluster"]);
            let line = format!("Segment from {}: {} - {}", table.name(), name, details);
            findings.push(
                InsightCategory::Segments,
                line.trim_end_matches([',', ' ', '-']).to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            name,
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_rule_dispatch() {
        assert_eq!(TableRule::for_table("key_metrics"), TableRule::KeyMetrics);
        assert_eq!(TableRule::for_table("worker_retention_curve"), TableRule::Retention);
        assert_eq!(
            TableRule::for_table("hourly_shift_metrics"),
            TableRule::ShiftTiming { hourly: true }
        );
        assert_eq!(TableRule::for_table("something_else"), TableRule::Generic);
    }

    #[test]
    fn test_shift_aggregation_counts_unique_shifts() {
        let offers = table(
            "shift_offers",
            &["shift_id", "worker_id", "claimed_at", "is_verified", "rate"],
            &[
                &["s1", "w1", "2024-01-01", "True", "40"],
                &["s1", "w2", "", "False", "45"],
                &["s2", "w1", "", "False", "30"],
                &["s3", "w3", "2024-01-03", "False", "50"],
            ],
        );

        let findings = process(&offers).unwrap();
        let summary = findings.insights.get(InsightCategory::MarketplaceSummary);
        assert_eq!(
            summary[0],
            "Shift-level metrics (properly aggregated): 2/3 shifts filled (66.67%)"
        );
        assert_eq!(summary[1], "Shift completion rate: 50.00%");
        assert_eq!(
            findings.insights.get(InsightCategory::PriceSensitivity)[0],
            "Dynamic pricing detected in 1 shifts (33.33%) with average change of $5.00"
        );
        assert!(findings.validations.contains(&"Found 4 offers for 3 unique shifts".to_string()));
        assert_eq!(
            findings.insights.get(InsightCategory::DataQuality),
            ["Multiple workers can be assigned to the same shift (1 examples found)"]
        );
    }

    #[test]
    fn test_duplicate_offers_with_identical_rates() {
        let offers = table(
            "offers",
            &["shift_id", "worker_id", "rate"],
            &[
                &["s1", "w1", "40"],
                &["s1", "w1", "40"],
                &["s2", "w2", "30"],
                &["s2", "w2", "35"],
            ],
        );

        let findings = process(&offers).unwrap();
        assert_eq!(
            findings.insights.get(InsightCategory::PriceSensitivity),
            ["Found 2 offers with real price changes visible to workers"]
        );
        assert_eq!(
            findings.insights.get(InsightCategory::DataQuality),
            ["Data quality issue: 2 duplicate offers have identical rates"]
        );
    }

    #[test]
    fn test_churn_window_missing_thirty_days() {
        let churn = table("worker_churn", &["days", "retention_rate"], &[&["7", "0.8"], &["14", "0.6"]]);
        let findings = process(&churn).unwrap();
        assert_eq!(
            findings.insights.get(InsightCategory::DataQuality),
            ["Churn definition does not appear to use standard 30-day period"]
        );
    }

    #[test]
    fn test_retention_reports_thirty_day_standard() {
        let retention_table = table(
            "worker_retention",
            &["period", "retention_rate", "days"],
            &[&["30 days", "0.5", "30"], &["60 days", "0.3", "60"]],
        );
        let findings = process(&retention_table).unwrap();
        assert_eq!(
            findings.insights.get(InsightCategory::MarketplaceSummary),
            ["Retention metrics from worker_retention: Average retention rate: 40.00% (30-day standard: Yes)"]
        );
        assert_eq!(
            findings.validations,
            ["Confirmed 30-day churn/retention metric: 0.5"]
        );
    }

    #[test]
    fn test_hourly_best_and_worst() {
        let hourly = table(
            "hourly_shift_metrics",
            &["view_hour", "claim_rate"],
            &[&["6", "0.10"], &["9", "0.45"], &["22", "0.05"]],
        );
        let findings = process(&hourly).unwrap();
        assert_eq!(
            findings.insights.get(InsightCategory::TimingPatterns),
            [
                "Best hour for claims: 9 (claim rate: 45.00%)",
                "Worst hour for claims: 22 (claim rate: 5.00%)",
            ]
        );
    }

    #[test]
    fn test_concentration_formats_pct_columns() {
        let concentration_table = table(
            "workplace_concentration_metrics",
            &["workplace_bucket", "shift_pct", "count"],
            &[&["Top 10%", "45.5", "12"]],
        );
        let findings = process(&concentration_table).unwrap();
        assert_eq!(
            findings.insights.get(InsightCategory::MarketplaceSummary),
            ["Workplaces concentration - Top 10%: shift_pct: 45.50%"]
        );
    }

    #[test]
    fn test_segments_skip_cluster_and_blanks() {
        let segments = table(
            "worker_behavior_segments",
            &["segment_name", "cluster", "claim_rate", "notes"],
            &[&["Night owls", "2", "0.4", ""]],
        );
        let findings = process(&segments).unwrap();
        assert_eq!(
            findings.insights.get(InsightCategory::Segments),
            ["Worker segment: Night owls - claim_rate: 0.4"]
        );
    }

    #[test]
    fn test_first_claim_requires_columns() {
        let broken = table("first_claim_metrics", &["name"], &[&["x"]]);
        let err = process(&broken).unwrap_err();
        assert!(matches!(err.kind, ExtractionErrorKind::MissingColumn { .. }));
    }

    #[test]
    fn test_generic_scan_skips_text_columns() {
        let generic = table(
            "fill_summary",
            &["region", "fill_rate", "rate_label"],
            &[&["north", "0.5", "high"], &["south", "0.7", "low"]],
        );
        let findings = process(&generic).unwrap();
        assert_eq!(
            findings.insights.get(InsightCategory::MarketplaceSummary),
            ["fill_summary: average fill_rate 60.00%"]
        );
    }
}
