// Mock test helpers and common mock patterns
//
// Reusable constructors with sensible defaults. Tests override specific
// behaviors while inheriting the baseline setup.
//
// Usage:
//     use crate::services::mocks::test_helpers::*;
//     let llm = Arc::new(ScriptedLlm::new(vec!["Final Answer: done"]));
//     let config = create_mock_config();

#[cfg(test)]
pub mod test_helpers {
    use super::super::traits::*;
    use crate::error::{IcebreakerError, Result};
    use crate::llm::{LlmAdapter, LlmProvider, LlmRequest, LlmResponse};
    use crate::profile::{Position, PositionHistory, ProfileRecord};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// LLM adapter that replays canned replies in order
    ///
    /// Every request is recorded so tests can inspect prompts. An exhausted
    /// script is an `LlmError`, unless the adapter was built with
    /// `repeating`, in which case the last reply is served forever.
    pub struct ScriptedLlm {
        replies: Mutex<VecDeque<String>>,
        repeat_last: bool,
        failure: Option<String>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl ScriptedLlm {
        pub fn new(replies: Vec<&str>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().map(String::from).collect()),
                repeat_last: false,
                failure: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn repeating(reply: &str) -> Self {
            Self {
                repeat_last: true,
                ..Self::new(vec![reply])
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                failure: Some(message.to_string()),
                ..Self::new(vec![])
            }
        }

        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmAdapter for ScriptedLlm {
        async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse> {
            self.requests.lock().unwrap().push(request);

            if let Some(message) = &self.failure {
                return Err(IcebreakerError::LlmError(message.clone()));
            }

            let mut replies = self.replies.lock().unwrap();
            let reply = if self.repeat_last && replies.len() == 1 {
                replies.front().cloned()
            } else {
                replies.pop_front()
            };

            reply
                .map(LlmResponse::text)
                .ok_or_else(|| IcebreakerError::LlmError("script exhausted".to_string()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Create a mock config service with test defaults
    ///
    /// Default behavior:
    /// - every API key returns "test-<provider>-key"
    /// - endpoints are not overridden
    /// - llm_provider() returns DeepSeek
    /// - llm_model() returns "test-model"
    /// - agent_max_iterations() returns 5
    pub fn create_mock_config() -> MockConfigService {
        let mut mock = MockConfigService::new();

        mock.expect_llm_provider().returning(|| LlmProvider::DeepSeek);
        mock.expect_llm_api_key()
            .returning(|| Ok("test-llm-key".to_string()));
        mock.expect_llm_api_base()
            .returning(|| "http://127.0.0.1:9/v1".to_string());
        mock.expect_llm_model()
            .returning(|| "test-model".to_string());
        mock.expect_search_api_key()
            .returning(|| Ok("test-search-key".to_string()));
        mock.expect_search_endpoint().returning(|| None);
        mock.expect_enrichment_api_key()
            .returning(|| Ok("test-enrichment-key".to_string()));
        mock.expect_enrichment_endpoint().returning(|| None);
        mock.expect_agent_max_iterations().returning(|| 5);
        mock.expect_bind_addr()
            .returning(|| "127.0.0.1:0".to_string());

        mock
    }

    /// A small, already-filtered profile record
    pub fn sample_profile_record() -> ProfileRecord {
        ProfileRecord {
            public_identifier: Some("eden-marco".to_string()),
            linkedin_url: Some("https://www.linkedin.com/in/eden-marco/".to_string()),
            first_name: Some("Eden".to_string()),
            last_name: Some("Marco".to_string()),
            headline: Some("Customer Engineer at Google".to_string()),
            location: Some("Tel Aviv, Israel".to_string()),
            positions: Some(PositionHistory {
                positions_count: Some(1),
                position_history: vec![Position {
                    title: Some("Customer Engineer".to_string()),
                    company_name: Some("Google".to_string()),
                    ..Position::default()
                }],
                extra: Default::default(),
            }),
            ..ProfileRecord::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::traits::*;
    use super::test_helpers::*;
    use crate::llm::{LlmAdapter, LlmRequest, Message};

    fn request() -> LlmRequest {
        LlmRequest::new(vec![Message::user("hi")])
    }

    #[tokio::test]
    async fn test_scripted_llm_replays_in_order() {
        let llm = ScriptedLlm::new(vec!["one", "two"]);
        assert_eq!(llm.complete_chat(request()).await.unwrap().content, "one");
        assert_eq!(llm.complete_chat(request()).await.unwrap().content, "two");
        assert!(llm.complete_chat(request()).await.is_err());
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_scripted_llm_repeating() {
        let llm = ScriptedLlm::repeating("again");
        for _ in 0..4 {
            assert_eq!(llm.complete_chat(request()).await.unwrap().content, "again");
        }
    }

    #[test]
    fn test_create_mock_config() {
        let config = create_mock_config();
        assert_eq!(config.llm_model(), "test-model");
        assert_eq!(config.agent_max_iterations(), 5);
    }

    #[test]
    fn test_sample_profile_record() {
        let record = sample_profile_record();
        assert_eq!(record.full_name().as_deref(), Some("Eden Marco"));
        assert!(!record.is_empty());
    }
}
