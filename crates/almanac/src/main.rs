//! Almanac CLI binary.
//!
//! This binary provides command-line access to Almanac's functionality:
//! - Run the full marketplace report
//! - Inspect extracted insights
//! - Preview individual step prompts

use almanac::{ObservabilityConfig, init_observability_with_config};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, load_config, run_report, show_insights, show_prompt, show_steps};

    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability_with_config(
        ObservabilityConfig::new()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    match cli.command {
        Commands::Run {
            output,
            max_retries,
            print_prompts,
        } => {
            let config = load_config(cli.config.as_deref(), cli.tables)?;
            run_report(config, output, max_retries, print_prompts).await?;
        }

        Commands::Insights => {
            let config = load_config(cli.config.as_deref(), cli.tables)?;
            show_insights(&config)?;
        }

        Commands::Prompt { step } => {
            let config = load_config(cli.config.as_deref(), cli.tables)?;
            show_prompt(&config, &step)?;
        }

        Commands::Steps => show_steps(),
    }

    Ok(())
}
