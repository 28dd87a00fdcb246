use crate::ServiceCredentials;
use crate::openai::{ChatMessage, ChatRequest, ChatResponse};
use almanac_core::{GenerationRequest, Role};
use almanac_error::{AlmanacResult, GenerationError, GenerationErrorKind, HttpError};
use almanac_interface::GenerationService;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Markers in an error body that mean the prompt was too large.
const OVERFLOW_MARKERS: &[&str] = &["context_length_exceeded", "maximum context length"];

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Each call sends the system role and the step prompt as two messages and
/// returns the first choice's text.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    credentials: ServiceCredentials,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `credentials` - API key and optional organization
    /// * `model` - Model identifier (e.g., "o1")
    /// * `api_base` - Base URL up to and including the version segment
    /// * `timeout` - Whole-request timeout for a single call
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be built.
    pub fn new(
        credentials: ServiceCredentials,
        model: impl Into<String>,
        api_base: &str,
        timeout: Duration,
    ) -> AlmanacResult<Self> {
        let model = model.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        let endpoint = format!("{}/chat/completions", api_base.trim_end_matches('/'));
        debug!(model = %model, endpoint = %endpoint, "Creating new OpenAI client");
        Ok(Self {
            client,
            credentials,
            model,
            endpoint,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn chat_request(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::new(Role::System, request.system_role().clone()),
                ChatMessage::new(Role::User, request.prompt().clone()),
            ],
        )
    }
}

#[async_trait]
impl GenerationService for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.model, prompt_chars = request.prompt().len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        debug!("Sending request to chat completions API");

        let mut call = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.credentials.api_key())
            .json(&self.chat_request(request));
        if let Some(organization) = self.credentials.organization() {
            call = call.header("OpenAI-Organization", organization);
        }

        let response = call.send().await.map_err(|e| {
            error!(error = ?e, "Failed to send request to chat completions API");
            GenerationError::new(classify_transport(&e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let kind = classify_failure(Some(status.as_u16()), &body);
            warn!(status = %status, kind = %kind, "Chat completions API returned error");
            return Err(GenerationError::new(kind));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse chat completions response");
            GenerationError::new(if e.is_timeout() {
                GenerationErrorKind::ConnectionFailed(e.to_string())
            } else {
                GenerationErrorKind::Unknown(format!("Failed to parse response: {}", e))
            })
        })?;

        match chat.text() {
            Some(text) => {
                debug!(response_id = %chat.id(), chars = text.len(), "Received completion");
                Ok(text.to_string())
            }
            None => Err(GenerationError::new(GenerationErrorKind::EmptyResponse)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn classify_transport(err: &reqwest::Error) -> GenerationErrorKind {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        GenerationErrorKind::ConnectionFailed(err.to_string())
    } else {
        GenerationErrorKind::Unknown(err.to_string())
    }
}

/// Maps a failed call to its error kind.
///
/// Size-limit failures are recognised from the status code (413) or from the
/// error body, whatever the status. `status` is `None` when no response was
/// received.
///
/// # Examples
///
/// ```
/// use almanac_error::GenerationErrorKind;
/// use almanac_models::classify_failure;
///
/// let body = r#"{"error":{"code":"context_length_exceeded"}}"#;
/// assert!(classify_failure(Some(400), body).is_overflow());
/// assert!(matches!(
///     classify_failure(Some(429), "slow down"),
///     GenerationErrorKind::RateLimited(_)
/// ));
/// ```
pub fn classify_failure(status: Option<u16>, body: &str) -> GenerationErrorKind {
    let lowered = body.to_lowercase();
    let mentions_overflow = OVERFLOW_MARKERS.iter().any(|m| lowered.contains(m))
        || (lowered.contains("token") && lowered.contains("exceed"));
    let detail = match status {
        Some(code) => format!("HTTP {}: {}", code, body),
        None => body.to_string(),
    };

    match status {
        Some(413) => GenerationErrorKind::Overflow(detail),
        _ if mentions_overflow => GenerationErrorKind::Overflow(detail),
        Some(429) => GenerationErrorKind::RateLimited(detail),
        Some(code) if (500..600).contains(&code) => GenerationErrorKind::ConnectionFailed(detail),
        None => GenerationErrorKind::ConnectionFailed(detail),
        Some(_) => GenerationErrorKind::Unknown(detail),
    }
}
