mod openai_compat;
mod types;

pub use openai_compat::OpenAiCompatAdapter;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;

/// Unified LLM interface that all adapters must implement
///
/// Only non-streaming completions are needed: both the lookup agent and the
/// summary generator consume whole responses.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Get a complete chat response
    async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Get the adapter name for logging/debugging
    fn name(&self) -> &str;
}

/// Factory function to create the adapter for an OpenAI-compatible provider
///
/// `api_base` and `model` fall back to the provider defaults when `None`.
pub fn create_adapter(
    provider: LlmProvider,
    api_key: String,
    api_base: Option<String>,
    model: Option<String>,
) -> Box<dyn LlmAdapter> {
    let api_base = api_base.unwrap_or_else(|| provider.default_api_base().to_string());
    let model = model.unwrap_or_else(|| provider.default_model().to_string());
    Box::new(OpenAiCompatAdapter::new(api_key, api_base, model))
}
