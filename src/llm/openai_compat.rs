use super::types::*;
use super::LlmAdapter;
use crate::error::{IcebreakerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Chat-completions adapter for any OpenAI wire-compatible endpoint
/// (DeepSeek, OpenAI, OpenRouter, local gateways).
pub struct OpenAiCompatAdapter {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
}

impl OpenAiCompatAdapter {
    pub fn new(api_key: String, api_base: String, default_model: String) -> Self {
        let client = Client::builder()
            .user_agent(crate::version::user_agent())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            api_base,
            default_model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    async fn send_request(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        self.client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| IcebreakerError::LlmError(format!("Failed to send request: {}", e)))
    }
}

#[async_trait]
impl LlmAdapter for OpenAiCompatAdapter {
    async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse> {
        let api_request = ApiRequest {
            model: request.model.unwrap_or_else(|| self.default_model.clone()),
            messages: request.messages,
            stream: false,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stop: request.stop,
        };

        tracing::debug!(
            "Sending {} messages to {} (model {})",
            api_request.messages.len(),
            self.endpoint(),
            api_request.model
        );

        let response = self.send_request(&api_request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(IcebreakerError::LlmError(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| IcebreakerError::LlmError(format!("Invalid completion payload: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| IcebreakerError::LlmError("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }

    fn name(&self) -> &str {
        "OpenAI-compatible"
    }
}

// Internal API types
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
