//! Retrying generation client.

use almanac_core::{GenerationRequest, TokenBudgetReducer, estimate_tokens};
use almanac_error::{GenerationError, GenerationErrorKind};
use almanac_interface::GenerationService;
use almanac_rate_limit::{RateLimiter, RetryPolicy};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, info, instrument, warn};

/// Wraps a [`GenerationService`] with backoff, overflow recovery and pacing.
///
/// Every call makes at most `max_retries` attempts. An overflow failure
/// shrinks the prompt aggressively and retries at once; any other failure
/// waits `base_delay * 2^(attempt - 1)` and retries the same prompt. Prompts
/// whose estimated size exceeds the preemptive threshold are reduced before
/// the first attempt.
#[derive(Debug)]
pub struct GenerationClient<S> {
    service: S,
    system_role: String,
    policy: RetryPolicy,
    reducer: TokenBudgetReducer,
    limiter: RateLimiter,
    print_prompts: bool,
}

impl<S: GenerationService> GenerationClient<S> {
    /// Creates a client with the default retry policy and budgets.
    pub fn new(service: S, system_role: impl Into<String>) -> Self {
        Self {
            service,
            system_role: system_role.into(),
            policy: RetryPolicy::default(),
            reducer: TokenBudgetReducer::default(),
            limiter: RateLimiter::unlimited(),
            print_prompts: false,
        }
    }

    /// Sets the attempt budget and backoff base.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the reducer used for preemptive and overflow reduction.
    pub fn with_reducer(mut self, reducer: TokenBudgetReducer) -> Self {
        self.reducer = reducer;
        self
    }

    /// Paces every attempt through `limiter`.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Echoes each prompt to stdout before it is sent.
    pub fn with_print_prompts(mut self, print_prompts: bool) -> Self {
        self.print_prompts = print_prompts;
        self
    }

    /// The wrapped service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Attempt budget and backoff base in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generates text for one step.
    ///
    /// # Errors
    ///
    /// Returns the last [`GenerationError`] once the attempt budget is spent.
    #[instrument(skip(self, prompt), fields(prompt_chars = prompt.chars().count()))]
    pub async fn call(&self, step: &str, prompt: &str) -> Result<String, GenerationError> {
        let first = if self.reducer.needs_preemptive_reduction(prompt) {
            let reduced = self.reducer.reduce(prompt, false);
            info!(
                estimated_tokens = estimate_tokens(prompt),
                reduced_chars = reduced.chars().count(),
                "Prompt exceeds the preemptive threshold, reducing before sending"
            );
            reduced
        } else {
            prompt.to_string()
        };

        let current = Mutex::new(first);
        let attempts = AtomicU32::new(0);
        let max_retries = *self.policy.max_retries();

        // The delay before the next attempt, chosen by the attempt that failed.
        let next_delay = Arc::new(AtomicU64::new(0));
        let delays = {
            let next_delay = Arc::clone(&next_delay);
            std::iter::repeat_with(move || Duration::from_millis(next_delay.load(Ordering::SeqCst)))
        };

        Retry::spawn(delays, || {
            let current = &current;
            let attempts = &attempts;
            let next_delay = &next_delay;
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                let prompt = current
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();

                match self.attempt(step, attempt, &prompt).await {
                    Ok(text) => Ok(text),
                    Err(err) if attempt >= max_retries => {
                        error!(attempt, max_retries, error = %err.kind, "Generation failed, attempts exhausted");
                        Err(RetryError::Permanent(err))
                    }
                    Err(err) if err.is_overflow() => {
                        let reduced = self.reducer.reduce(&prompt, true);
                        warn!(
                            attempt,
                            from_chars = prompt.chars().count(),
                            to_chars = reduced.chars().count(),
                            "Request exceeded the size limit, retrying with a reduced prompt"
                        );
                        *current.lock().unwrap_or_else(PoisonError::into_inner) = reduced;
                        next_delay.store(0, Ordering::SeqCst);
                        Err(RetryError::Transient {
                            err,
                            retry_after: None,
                        })
                    }
                    Err(err) => {
                        let delay = self.policy.delay_after(attempt);
                        warn!(attempt, ?delay, error = %err.kind, "Generation failed, backing off");
                        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                        next_delay.store(millis, Ordering::SeqCst);
                        Err(RetryError::Transient {
                            err,
                            retry_after: None,
                        })
                    }
                }
            }
        })
        .await
    }

    async fn attempt(&self, step: &str, attempt: u32, prompt: &str) -> Result<String, GenerationError> {
        self.limiter.acquire().await;

        if self.print_prompts {
            let rule = "=".repeat(80);
            println!("\n{rule}\nPROMPT FOR {step} (attempt {attempt})\n{rule}\n{prompt}\n{rule}\n");
        }

        debug!(
            attempt,
            estimated_tokens = estimate_tokens(prompt),
            provider = self.service.provider_name(),
            model = self.service.model_name(),
            "Sending generation request"
        );
        let request = GenerationRequest::new(self.system_role.clone(), prompt);
        let text = self.service.generate(&request).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
        }
        Ok(text)
    }
}
