//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Almanac CLI.
#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Generate multi-step strategic reports from marketplace summary tables", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the input CSV tables
    #[arg(short, long, global = true)]
    pub tables: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every report step and write the combined document
    Run {
        /// Directory receiving step outputs and the final document
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Total attempts per generation call
        #[arg(long)]
        max_retries: Option<u32>,

        /// Print each prompt before it is sent
        #[arg(long)]
        print_prompts: bool,
    },

    /// Print the extracted insights as JSON
    Insights,

    /// Print the prompt a step would send, with no upstream outputs
    Prompt {
        /// Step name (e.g., "market_structure")
        step: String,
    },

    /// List the report steps in execution order
    Steps,
}
