use super::{format_instructions, parse_summary, Summary};
use crate::error::Result;
use crate::llm::{LlmAdapter, LlmRequest, Message};
use crate::profile::ProfileRecord;
use crate::services::traits::SummaryService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Summarizes a profile record with one deterministic LLM call
pub struct SummaryGenerator {
    llm: Arc<dyn LlmAdapter>,
    model: Option<String>,
}

impl SummaryGenerator {
    pub fn new(llm: Arc<dyn LlmAdapter>) -> Self {
        Self { llm, model: None }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn render_prompt(record: &ProfileRecord) -> Result<String> {
        Ok(format!(
            "Given the LinkedIn information {information} about a person, create:\n\
             1. A short summary\n\
             2. Two interesting facts about them\n\n\
             Use only information from LinkedIn.\n\n\
             {instructions}",
            information = record.to_prompt_json()?,
            instructions = format_instructions(),
        ))
    }

    /// Infallible form: failures are logged and become the degraded summary
    pub async fn generate(&self, record: &ProfileRecord) -> Summary {
        match self.try_generate(record).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Summary generation failed: {}", e);
                Summary::generation_error()
            }
        }
    }
}

#[async_trait]
impl SummaryService for SummaryGenerator {
    async fn try_generate(&self, record: &ProfileRecord) -> Result<Summary> {
        let prompt = Self::render_prompt(record)?;

        let mut request = LlmRequest::new(vec![Message::user(prompt)]).with_temperature(0.0);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let response = self.llm.complete_chat(request).await?;
        debug!("Raw summary output:\n{}", response.content);

        let summary = parse_summary(&response.content)?;
        info!(
            "Generated summary with {} facts via {}",
            summary.facts.len(),
            self.llm.name()
        );
        Ok(summary)
    }
}
