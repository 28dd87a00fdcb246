//! Generation service providers for Almanac.
//!
//! The only provider is an OpenAI-compatible chat-completions client. It
//! classifies every failure into a [`GenerationErrorKind`](almanac_error::GenerationErrorKind)
//! at the HTTP boundary.
//!
//! ```no_run
//! use almanac_core::GenerationRequest;
//! use almanac_interface::GenerationService;
//! use almanac_models::{OpenAiClient, ServiceCredentials};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = ServiceCredentials::from_env()?;
//! let client = OpenAiClient::new(
//!     credentials,
//!     "o1",
//!     "https://api.openai.com/v1",
//!     Duration::from_secs(600),
//! )?;
//! let request = GenerationRequest::new("You are an analyst.", "Summarise the market.");
//! let text = client.generate(&request).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credentials;
mod openai;

pub use credentials::ServiceCredentials;
pub use openai::{
    ChatChoice, ChatMessage, ChatMessageBuilder, ChatReply, ChatRequest, ChatRequestBuilder,
    ChatResponse, OpenAiClient, classify_failure,
};
