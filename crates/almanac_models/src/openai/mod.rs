//! OpenAI-compatible chat-completions provider.

mod client;
mod dto;

pub use client::{OpenAiClient, classify_failure};
pub use dto::{
    ChatChoice, ChatMessage, ChatMessageBuilder, ChatReply, ChatRequest, ChatRequestBuilder,
    ChatResponse,
};
