//! Exponential backoff schedule for generation attempts.

use std::time::Duration;

/// How many attempts a generation call gets and how long to wait between them.
///
/// `max_retries` counts total attempts, not retries after the first. The
/// delay before attempt `n + 1` is `base_delay * 2^(n - 1)`.
///
/// # Examples
///
/// ```
/// use almanac_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_secs(5));
/// let delays: Vec<_> = (1..=3).map(|attempt| policy.delay_after(attempt)).collect();
///
/// assert_eq!(
///     delays,
///     vec![Duration::from_secs(5), Duration::from_secs(10), Duration::from_secs(20)]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Total attempts allowed, at least one
    max_retries: u32,
    /// Delay after the first transient failure
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. Zero attempts is raised to one.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}
