//! OpenAI-compatible chat completions client.
//!
//! Gemini exposes an OpenAI compatibility layer; this client speaks the
//! `chat/completions` request/response shape against that endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::Error;
use crate::Result;

use super::super::message::Message;
use super::{ChatCompletionResponse, LlmClient, LlmResponse, Usage};

/// Chat completions client using bearer API key authentication.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl ChatCompletionsClient {
    /// Create a new client. Pure configuration; no request is issued.
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            model: model.to_string(),
            client: Client::new(),
        }
    }

    fn build_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn parse_response(&self, response: ChatCompletionResponse) -> Result<LlmResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("No choices in response".to_string()))?;

        let usage = response
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens.unwrap_or(0),
                completion_tokens: u.completion_tokens.unwrap_or(0),
                total_tokens: u.total_tokens.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<LlmResponse> {
        let request = json!({
            "model": model,
            "messages": messages,
        });

        let response = self
            .client
            .post(self.build_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(Error::Llm(format!("Gemini API error: {error_text}")));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        self.parse_response(completion)
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}
