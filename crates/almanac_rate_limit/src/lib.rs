//! Retry policy, request pacing and configuration for Almanac.
//!
//! - [`RetryPolicy`] describes the backoff schedule of a generation call.
//! - [`RateLimiter`] optionally paces requests with a per-minute quota.
//! - [`AlmanacConfig`] merges the bundled `almanac.toml` with user overrides.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod retry;

pub use config::{AlmanacConfig, OutputConfig, RateLimitConfig, RetryConfig, ServiceConfig};
pub use limiter::RateLimiter;
pub use retry::RetryPolicy;
