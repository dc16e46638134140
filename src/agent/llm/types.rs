//! Wire types for OpenAI-compatible chat completions responses.
//!
//! Gemini is reached through its OpenAI compatibility layer, so the shapes
//! here follow the `chat/completions` response format rather than the native
//! Gemini one.

use serde::Deserialize;

/// Top-level chat completions response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<UsageData>,
}

/// A single response choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message inside a choice.
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub role: String,
    pub content: Option<String>,
}

/// Token usage accounting.
#[derive(Debug, Deserialize)]
pub struct UsageData {
    pub prompt_tokens: Option<usize>,
    pub completion_tokens: Option<usize>,
    pub total_tokens: Option<usize>,
}
