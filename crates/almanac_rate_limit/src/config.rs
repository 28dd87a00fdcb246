//! Layered TOML configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from almanac.toml)
//! - `~/.config/almanac/almanac.toml`
//! - `./almanac.toml`
//! - An explicit file passed by the caller

use crate::{RateLimiter, RetryPolicy};
use almanac_core::BudgetConfig;
use almanac_error::{AlmanacResult, ConfigError};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../almanac.toml");

/// Generation service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ServiceConfig {
    /// Model identifier sent with every request
    model: String,
    /// Base URL of the chat-completions API
    api_base: String,
    /// Fixed system role sent with every step
    system_role: String,
    /// Per-call timeout
    request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Per-call timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RetryConfig {
    /// Total attempts per generation call
    max_retries: u32,
    /// Base delay for exponential backoff
    base_delay_seconds: u64,
}

impl RetryConfig {
    /// Converts to the runtime retry policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.base_delay_seconds))
    }
}

/// Request pacing settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per minute, unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
}

impl RateLimitConfig {
    /// Builds the limiter described by this section.
    pub fn limiter(&self) -> RateLimiter {
        RateLimiter::new(self.requests_per_minute)
    }
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct OutputConfig {
    /// Directory receiving step outputs and the final document
    root: PathBuf,
    /// Directory holding the input CSV tables
    tables: PathBuf,
    /// File name of the combined document, relative to `root`
    final_document: String,
    /// Echo every prompt to stdout before sending
    print_prompts: bool,
}

/// Top-level Almanac configuration.
///
/// # Example
///
/// ```no_run
/// use almanac_rate_limit::AlmanacConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AlmanacConfig::load(None)?;
/// println!("Model: {}", config.service().model());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct AlmanacConfig {
    /// Generation service settings
    service: ServiceConfig,
    /// Retry settings
    retry: RetryConfig,
    /// Prompt budget
    #[serde(default)]
    budget: BudgetConfig,
    /// Request pacing
    #[serde(default)]
    rate_limit: RateLimitConfig,
    /// Output locations
    output: OutputConfig,
}

impl AlmanacConfig {
    /// Bundled defaults only, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse or validate.
    pub fn bundled() -> AlmanacResult<Self> {
        Self::finish(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Loads configuration with precedence:
    /// explicit file > current dir > home dir > bundled defaults.
    ///
    /// User files are optional and skipped if not found. An explicit file
    /// must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any present source fails to parse or the merged
    /// values fail validation.
    #[instrument(skip(explicit), fields(explicit = ?explicit.map(Path::display)))]
    pub fn load(explicit: Option<&Path>) -> AlmanacResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/almanac/almanac.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("almanac").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        Self::finish(builder)
    }

    /// Loads bundled defaults overlaid with a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> AlmanacResult<Self> {
        Self::finish(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref()).required(true)),
        )
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> AlmanacResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first violated constraint.
    pub fn validate(&self) -> AlmanacResult<()> {
        if self.retry.max_retries == 0 {
            return Err(ConfigError::for_key("retry.max_retries", "must be at least 1").into());
        }
        if self.service.model.trim().is_empty() {
            return Err(ConfigError::for_key("service.model", "must not be empty").into());
        }
        if self.service.request_timeout_seconds == 0 {
            return Err(ConfigError::for_key("service.request_timeout_seconds", "must be positive").into());
        }
        self.budget
            .validate()
            .map_err(|e| ConfigError::new(format!("budget: {}", e)))?;
        Ok(())
    }

    /// Overrides the attempt count.
    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.retry.max_retries = max_retries.max(1);
    }

    /// Overrides prompt echoing.
    pub fn set_print_prompts(&mut self, print_prompts: bool) {
        self.output.print_prompts = print_prompts;
    }

    /// Overrides the output directory.
    pub fn set_output_root(&mut self, root: impl Into<PathBuf>) {
        self.output.root = root.into();
    }

    /// Overrides the input table directory.
    pub fn set_tables_dir(&mut self, tables: impl Into<PathBuf>) {
        self.output.tables = tables.into();
    }
}
