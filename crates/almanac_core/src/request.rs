//! Request type sent to a generation service.

use serde::{Deserialize, Serialize};

/// A single stateless generation call: a fixed system role plus the step prompt.
///
/// # Examples
///
/// ```
/// use almanac_core::GenerationRequest;
///
/// let request = GenerationRequest::builder()
///     .system_role("You are a marketplace analyst.")
///     .prompt("Summarise the metrics.")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.prompt(), "Summarise the metrics.");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Fixed role description sent as the system message
    system_role: String,
    /// User prompt for the step
    prompt: String,
}

impl GenerationRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// Creates a request directly from its two parts.
    pub fn new(system_role: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_role: system_role.into(),
            prompt: prompt.into(),
        }
    }
}
