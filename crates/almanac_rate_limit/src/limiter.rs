//! Request pacing using governor.
//!
//! Only a requests-per-minute quota is supported. The limiter is a no-op when
//! no quota is configured.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::trace;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Optional requests-per-minute pacing shared by every attempt of a run.
#[derive(Clone, Default)]
pub struct RateLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    requests_per_minute: Option<u32>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

impl RateLimiter {
    /// Creates a limiter. `None` or zero disables pacing.
    pub fn new(requests_per_minute: Option<u32>) -> Self {
        let rpm_limiter = requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))));
        Self {
            requests_per_minute: rpm_limiter.as_ref().and(requests_per_minute),
            rpm_limiter,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Configured quota, if pacing is enabled.
    pub fn requests_per_minute(&self) -> Option<u32> {
        self.requests_per_minute
    }

    /// Waits until the next request is allowed.
    pub async fn acquire(&self) {
        if self.try_acquire() {
            return;
        }
        if let Some(limiter) = &self.rpm_limiter {
            trace!("Request quota spent, waiting");
            limiter.until_ready().await;
        }
    }

    /// Takes a slot without waiting. Returns false when the quota is spent.
    pub fn try_acquire(&self) -> bool {
        match &self.rpm_limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}
