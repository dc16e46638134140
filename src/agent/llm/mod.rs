//! LLM client abstraction layer.
//!
//! This module provides:
//! - [`LlmClient`] trait for swappable LLM providers
//! - [`ChatCompletionsClient`], the production client for the Gemini
//!   OpenAI-compatible endpoint
//!
//! # Adding a New Provider
//!
//! 1. Create a new file (e.g., `anthropic.rs`)
//! 2. Implement the `LlmClient` trait
//! 3. Construct it in `main.rs` where the client is built

mod types;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use types::*;

pub mod openai;

pub use openai::ChatCompletionsClient;

use super::message::Message;

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Text content of the response.
    pub content: String,

    /// Reason the response finished.
    pub finish_reason: String,

    /// Token usage statistics.
    pub usage: Usage,
}

impl LlmResponse {
    /// Create a simple text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// LLM client trait — swappable provider abstraction.
///
/// Construction is pure configuration; no request is made until [`chat`]
/// is called. Implementations are shared read-only across all agents and
/// sessions.
///
/// [`chat`]: LlmClient::chat
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send messages to the named model and get a response.
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<LlmResponse>;

    /// Get the default model for this provider.
    fn default_model(&self) -> &str;
}

/// Fake LLM client for testing.
#[cfg(test)]
pub struct FakeLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<LlmResponse>>>,
}

#[cfg(test)]
impl FakeLlmClient {
    /// Create with predefined text responses.
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: std::sync::Mutex::new(
                responses.iter().map(|s| Ok(LlmResponse::text(*s))).collect(),
            ),
        }
    }

    /// Create with a single failing response.
    pub fn failing(message: &str) -> Self {
        Self {
            responses: std::sync::Mutex::new(
                vec![Err(crate::error::Error::Llm(message.to_string()))].into(),
            ),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn chat(&self, _model: &str, _messages: &[Message]) -> Result<LlmResponse> {
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop_front()
            .unwrap_or_else(|| Err(crate::error::Error::Llm("No more fake responses".to_string())))
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }
}
