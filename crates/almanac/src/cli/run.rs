//! Command handlers.

use almanac::{
    AlmanacConfig, AlmanacResult, StepOutputs, extract_insights, find_step, generate_report,
    insights_json, marketplace_steps, openai_service,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads configuration and applies the global overrides.
pub fn load_config(config: Option<&Path>, tables: Option<PathBuf>) -> AlmanacResult<AlmanacConfig> {
    let mut config = AlmanacConfig::load(config)?;
    if let Some(tables) = tables {
        config.set_tables_dir(tables);
    }
    Ok(config)
}

/// Runs the full report and prints a per-step summary.
///
/// Returns an error when a required step failed, after the summary is printed.
pub async fn run_report(
    mut config: AlmanacConfig,
    output: Option<PathBuf>,
    max_retries: Option<u32>,
    print_prompts: bool,
) -> AlmanacResult<()> {
    if let Some(output) = output {
        config.set_output_root(output);
    }
    if let Some(max_retries) = max_retries {
        config.set_max_retries(max_retries);
    }
    if print_prompts {
        config.set_print_prompts(true);
    }
    config.validate()?;

    let service = openai_service(&config)?;
    let run = generate_report(service, &config).await?;

    println!("\n{:<28} {:<10} {}", "STEP", "REQUIRED", "OUTCOME");
    for record in run.records() {
        println!(
            "{:<28} {:<10} {}",
            record.name(),
            if *record.required() { "yes" } else { "no" },
            record.outcome()
        );
    }

    for warning in run.warnings() {
        println!("warning: {}", warning);
    }

    if let Some(path) = run.document_path() {
        info!(path = %path.display(), "Report written");
        println!("\nFinal document: {}", path.display());
    }

    run.ensure_completed()?;
    Ok(())
}

/// Prints extracted insights as pretty JSON.
pub fn show_insights(config: &AlmanacConfig) -> AlmanacResult<()> {
    let insights = extract_insights(config)?;
    println!("{}", insights_json(&insights)?);
    Ok(())
}

/// Prints the prompt for one step as the first step of a run would see it.
pub fn show_prompt(config: &AlmanacConfig, step: &str) -> AlmanacResult<()> {
    let steps = marketplace_steps();
    let found = find_step(&steps, step)?;
    let insights = extract_insights(config)?;
    println!("{}", found.build_prompt(&insights, &StepOutputs::new()));
    Ok(())
}

/// Prints the step list.
pub fn show_steps() {
    for (index, step) in marketplace_steps().iter().enumerate() {
        let kind = if step.is_required() { "required" } else { "optional" };
        println!("{:>2}. {:<28} {:<9} {}", index + 1, step.name(), kind, step.title());
    }
}
