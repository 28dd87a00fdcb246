//! The generation service trait.

use almanac_core::GenerationRequest;
use almanac_error::GenerationError;
use async_trait::async_trait;
use std::sync::Arc;

/// A remote text generation service.
///
/// Implementations perform exactly one attempt per call. Retries, backoff and
/// prompt reduction belong to the caller. Failures must be classified at the
/// boundary: context-length rejections as
/// [`GenerationErrorKind::Overflow`](almanac_error::GenerationErrorKind::Overflow),
/// everything else as a transient kind.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Sends one request and returns the generated text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "o1").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T> GenerationService for Arc<T>
where
    T: GenerationService + ?Sized,
{
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_error::GenerationErrorKind;

    struct Echo;

    #[async_trait]
    impl GenerationService for Echo {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            if request.prompt().is_empty() {
                return Err(GenerationError::new(GenerationErrorKind::EmptyResponse));
            }
            Ok(request.prompt().to_uppercase())
        }

        fn provider_name(&self) -> &'static str {
            "echo"
        }

        fn model_name(&self) -> &str {
            "echo-1"
        }
    }

    #[tokio::test]
    async fn shared_service_delegates() {
        let service: Arc<dyn GenerationService> = Arc::new(Echo);
        let request = GenerationRequest::new("system", "hello");
        assert_eq!(service.generate(&request).await.ok().as_deref(), Some("HELLO"));
        assert_eq!(service.provider_name(), "echo");
        assert_eq!(service.model_name(), "echo-1");

        let empty = GenerationRequest::new("system", "");
        assert!(service.generate(&empty).await.is_err());
    }
}
