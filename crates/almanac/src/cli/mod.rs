//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the almanac binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{load_config, run_report, show_insights, show_prompt, show_steps};
