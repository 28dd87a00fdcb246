use almanac::{
    AlmanacConfig, GenerationError, GenerationErrorKind, GenerationRequest, GenerationService,
    Insights, StepOutcome, extract_insights, generate_report, insights_json, marketplace_steps,
};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Fails the listed 1-based calls with a connection error and answers the rest.
struct CannedService {
    prompts: Mutex<Vec<String>>,
    failing: Vec<usize>,
}

impl CannedService {
    fn new(failing: Vec<usize>) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            failing,
        }
    }
}

#[async_trait]
impl GenerationService for CannedService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.prompt().clone());
            prompts.len()
        };
        if self.failing.contains(&call) {
            return Err(GenerationError::new(GenerationErrorKind::ConnectionFailed(
                "connection reset".to_string(),
            )));
        }
        Ok(format!("Analysis number {}", call))
    }

    fn provider_name(&self) -> &'static str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned-model"
    }
}

fn workspace() -> (TempDir, AlmanacConfig) {
    let dir = TempDir::new().unwrap();
    let tables = dir.path().join("tables");
    fs::create_dir(&tables).unwrap();
    fs::write(
        tables.join("key_metrics.csv"),
        "category,metric,value,formatted_value\nSupply,Active workers,1200,\"1,200\"\n",
    )
    .unwrap();

    let config_path = dir.path().join("almanac.toml");
    fs::write(
        &config_path,
        format!(
            "[retry]\nmax_retries = 1\nbase_delay_seconds = 0\n\n[output]\nroot = \"{}\"\ntables = \"{}\"\n",
            dir.path().join("out").display(),
            tables.display()
        ),
    )
    .unwrap();

    let config = AlmanacConfig::from_file(&config_path).unwrap();
    (dir, config)
}

fn out(dir: &TempDir) -> PathBuf {
    dir.path().join("out")
}

#[tokio::test]
async fn test_full_report_is_written() {
    let (dir, config) = workspace();
    let service = Arc::new(CannedService::new(vec![]));

    let run = generate_report(Arc::clone(&service), &config).await.unwrap();

    assert!(run.is_completed());
    assert_eq!(run.records().len(), marketplace_steps().len());
    assert!(run.records().iter().all(|r| r.outcome().is_success()));

    let prompts = service.prompts.lock().unwrap().clone();
    assert!(prompts[0].contains("- Supply - Active workers: 1,200"));

    let document = fs::read_to_string(out(&dir).join("final_multi_step_analysis.md")).unwrap();
    assert!(document.starts_with("# Comprehensive Marketplace Analysis"));
    assert!(document.contains("## Key Metrics & Patterns\n\nAnalysis number 1"));
    assert!(out(&dir).join("market_structure.md").exists());
}

#[tokio::test]
async fn test_optional_failure_is_skipped() {
    let (dir, config) = workspace();
    // Call 9 is the first optional step.
    let service = Arc::new(CannedService::new(vec![9]));

    let run = generate_report(Arc::clone(&service), &config).await.unwrap();

    assert!(run.is_completed());
    assert_eq!(run.warnings().len(), 1);
    assert!(matches!(run.records()[8].outcome(), StepOutcome::Degraded(_)));
    assert!(!run.final_document().contains("Worker Journey Analysis"));
    assert!(out(&dir).join("final_multi_step_analysis.md").exists());
}

#[tokio::test]
async fn test_required_failure_aborts_without_document() {
    let (dir, config) = workspace();
    let service = Arc::new(CannedService::new(vec![2]));

    let run = generate_report(Arc::clone(&service), &config).await.unwrap();

    assert!(!run.is_completed());
    assert!(run.ensure_completed().is_err());
    assert_eq!(run.records().len(), 2);
    assert_eq!(service.prompts.lock().unwrap().len(), 2);
    assert!(!out(&dir).join("final_multi_step_analysis.md").exists());
    assert!(run.records()[1].path().exists());
}

#[test]
fn test_insights_render_as_json() {
    let (_dir, config) = workspace();
    let insights = extract_insights(&config).unwrap();

    let json = insights_json(&insights).unwrap();

    assert!(json.contains("\"marketplace_summary\""));
    assert!(json.contains("Supply - Active workers: 1,200"));
    let parsed: Insights = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, insights);
}
