use almanac_core::{InsightCategory, Table};
use almanac_insights::{InsightExtractor, TableDirectory, read_table, read_table_with_warnings};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn sample_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "key_metrics.csv",
        "category,metric,value,formatted_value\n\
         Supply,Active workers,1200,\"1,200\"\n\
         Demand,Shifts posted,800,\n",
    );
    write(
        dir.path(),
        "worker_aggregates.csv",
        "worker_id,claim_rate,completion_rate,churn_window_days\n\
         w1,0.5,0.9,14\n\
         w2,0.3,0.7,14\n",
    );
    write(
        dir.path(),
        "first_claim_metrics.csv",
        "name,amount\nmedian_hours,12\n",
    );
    fs::create_dir(dir.path().join("nested")).unwrap();
    write(
        &dir.path().join("nested"),
        "rate_change_impact.csv",
        "rate_change,claim_rate\n+10%,0.42\n",
    );
    write(dir.path(), "notes.txt", "not a table");
    dir
}

#[test]
fn test_scan_is_sorted_and_recursive() {
    let dir = sample_dir();
    let files = TableDirectory::new(dir.path()).scan().unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
        .collect();

    assert_eq!(
        names,
        [
            "first_claim_metrics.csv",
            "key_metrics.csv",
            "nested/rate_change_impact.csv",
            "worker_aggregates.csv",
        ]
    );
}

#[test]
fn test_scan_missing_directory_fails() {
    assert!(TableDirectory::new("/no/such/tables").scan().is_err());
}

#[test]
fn test_read_table_pads_short_rows() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "short.csv", "a,b,c\n1,2\n");
    let table = read_table(&dir.path().join("short.csv")).unwrap();

    assert_eq!(table.name(), "short");
    assert_eq!(table.rows()[0].len(), 3);
    assert_eq!(table.cell(0, "c"), None);
}

#[test]
fn test_read_table_reports_rows_wider_than_header() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "wide.csv", "a,b\n1,2\n3,4,5,6\n7,8\n");
    let (table, warnings) = read_table_with_warnings(&dir.path().join("wide.csv")).unwrap();

    assert_eq!(table.rows()[1], ["3", "4"]);
    assert_eq!(
        warnings,
        ["WARNING: wide has rows wider than its 2 columns (rows 2); extra cells were ignored"]
    );
}

#[test]
fn test_wide_rows_land_in_data_quality() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "wide.csv", "segment_name,claim_rate\nNew,0.5,extra\n");
    let insights = InsightExtractor::new().extract_dir(dir.path()).unwrap();

    assert!(insights
        .get(InsightCategory::DataQuality)
        .iter()
        .any(|entry| entry.starts_with("WARNING: wide has rows wider than its 2 columns")));
}

#[test]
fn test_extract_dir_applies_table_rules() {
    let dir = sample_dir();
    let insights = InsightExtractor::new().extract_dir(dir.path()).unwrap();

    assert_eq!(
        insights.get(InsightCategory::MarketplaceSummary),
        ["Supply - Active workers: 1,200", "Demand - Shifts posted: 800"]
    );
    assert_eq!(
        insights.get(InsightCategory::WorkerMetrics),
        [
            "Total workers: 2",
            "Average claim rate: 40.00%",
            "Average completion rate: 80.00%",
        ]
    );
    assert_eq!(
        insights.get(InsightCategory::PriceSensitivity),
        ["Rate change '+10%' leads to claim rate: 42.00%"]
    );
}

#[test]
fn test_failing_table_is_recorded_and_extraction_continues() {
    let dir = sample_dir();
    let insights = InsightExtractor::new().extract_dir(dir.path()).unwrap();
    let data_quality = insights.get(InsightCategory::DataQuality);

    assert_eq!(
        data_quality[0],
        "Non-standard churn definition: 14 days (standard is 30 days)"
    );
    assert!(data_quality.iter().any(|entry| entry
        .starts_with("ERROR: Failed to process first_claim_metrics:")));
    assert!(data_quality.iter().any(|entry| entry
        == "WARNING: Worker churn uses 14-day definition, not the standard 30-day"));
    // Tables after the failing one were still processed.
    assert!(!insights.get(InsightCategory::WorkerMetrics).is_empty());
}

#[test]
fn test_unreadable_file_is_recorded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("garbled.csv"), b"a,b\n\xff\xfe,1\n").unwrap();

    let insights = InsightExtractor::new().extract_dir(dir.path()).unwrap();
    let data_quality = insights.get(InsightCategory::DataQuality);
    assert_eq!(data_quality.len(), 1);
    assert!(data_quality[0].starts_with("ERROR: Failed to process garbled:"));
}

#[test]
fn test_extraction_is_idempotent() {
    let dir = sample_dir();
    let extractor = InsightExtractor::new();
    let first = extractor.extract_dir(dir.path()).unwrap();
    let second = extractor.extract_dir(dir.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_duplicates_across_tables_are_removed() {
    let columns = vec!["category".to_string(), "metric".to_string(), "value".to_string()];
    let row = vec!["Supply".to_string(), "Active".to_string(), "10".to_string()];
    let first = Table::new("key_metrics", columns.clone(), vec![row.clone(), row.clone()]);
    let second = Table::new("key_metrics", columns, vec![row]);

    let insights = InsightExtractor::new().extract([first, second]);
    assert_eq!(
        insights.get(InsightCategory::MarketplaceSummary),
        ["Supply - Active: 10"]
    );
}

#[test]
fn test_data_quality_is_first_category() {
    let dir = sample_dir();
    let insights = InsightExtractor::new().extract_dir(dir.path()).unwrap();
    let first = insights.iter().next().map(|(category, _)| category);
    assert_eq!(first, Some(InsightCategory::DataQuality));
}
