use crate::error::IcebreakerError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// OpenAI-compatible providers the adapter knows defaults for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    DeepSeek,
    OpenAI,
    OpenRouter,
}

impl LlmProvider {
    /// Get the default API base URL for this provider
    pub fn default_api_base(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "https://api.deepseek.com/v1",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Get the default environment variable name for this provider's API key
    pub fn default_env_var(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "DEEPSEEK_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Model used when the request does not override it
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::DeepSeek => "deepseek-chat",
            LlmProvider::OpenAI => "gpt-4o-mini",
            LlmProvider::OpenRouter => "deepseek/deepseek-chat",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = IcebreakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Ok(LlmProvider::DeepSeek),
            "openai" => Ok(LlmProvider::OpenAI),
            "openrouter" => Ok(LlmProvider::OpenRouter),
            other => Err(IcebreakerError::ConfigError(format!(
                "unknown LLM provider '{}', expected deepseek, openai or openrouter",
                other
            ))),
        }
    }
}

/// Unified request format for all LLM adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub model: Option<String>, // Override default model
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,

    /// Sequences that end generation (the ReAct loop stops before "Observation:")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl LlmRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            stop: None,
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }
}

/// Unified response format from LLM adapters
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub finish_reason: Option<String>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some("stop".to_string()),
        }
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
