// Profile Lookup Agent
// Finds a person's LinkedIn profile URL with a ReAct loop over the search tool

use crate::agent::{Agent, AgentConfig, AgentError};
use crate::error::{IcebreakerError, Result};
use crate::llm::LlmAdapter;
use crate::profile::ProfileUrl;
use crate::search::{ProfileSearchTool, SearchProvider};
use crate::services::traits::UrlResolver;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Create the profile lookup agent
///
/// Deterministic sampling, no model override (the adapter default is used)
/// and the given iteration limit.
pub fn create_profile_lookup_agent(max_iterations: usize) -> AgentConfig {
    AgentConfig {
        id: "profile_lookup".to_string(),
        name: "Profile Lookup".to_string(),
        instructions: r#"You are a research assistant that finds LinkedIn profile pages.

Guidelines:
- Search with the person's full name exactly as given
- Only answer with a URL that a tool returned to you
- If the tool reports that no profile was found, answer with that message
- Never invent or guess a profile URL"#
            .to_string(),
        model: None,
        temperature: 0.0,
        max_iterations,
    }
}

/// The task handed to the agent for one name
pub fn lookup_task(name: &str) -> String {
    format!(
        "Given the full name {}, find the URL to their LinkedIn profile page. \
         Your answer should contain only the URL.",
        name
    )
}

/// Resolves names to profile URLs with the lookup agent
pub struct ProfileUrlResolver {
    agent: Agent,
}

impl ProfileUrlResolver {
    pub fn new(
        llm: Arc<dyn LlmAdapter>,
        search: Arc<dyn SearchProvider>,
        max_iterations: usize,
    ) -> Self {
        let tools = Arc::new(ProfileSearchTool::new(search));
        let agent = Agent::new(create_profile_lookup_agent(max_iterations), llm, tools);
        Self { agent }
    }
}

#[async_trait]
impl UrlResolver for ProfileUrlResolver {
    async fn resolve(&self, name: &str) -> Result<ProfileUrl> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IcebreakerError::InvalidInput(
                "name must not be empty".to_string(),
            ));
        }

        info!("Resolving profile URL for '{}'", name);
        match self.agent.run(&lookup_task(name)).await {
            Ok(run) => {
                let url = ProfileUrl::from_answer(&run.answer);
                info!(
                    "Agent '{}' answered {} after {} iterations",
                    self.agent.id(),
                    url,
                    run.iterations
                );
                Ok(url)
            }
            Err(AgentError::MaxIterations { limit, .. }) => {
                warn!("No profile URL for '{}' within {} iterations", name, limit);
                Ok(ProfileUrl::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DEFAULT_MAX_ITERATIONS;
    use crate::search::{MockSearchProvider, SearchResult, SEARCH_TOOL_NAME};
    use crate::services::mocks::test_helpers::ScriptedLlm;

    fn provider_returning(urls: &'static [&'static str]) -> MockSearchProvider {
        let mut provider = MockSearchProvider::new();
        provider.expect_search().returning(move |_| {
            Ok(urls
                .iter()
                .map(|url| SearchResult {
                    url: url.to_string(),
                    title: None,
                    snippet: None,
                })
                .collect())
        });
        provider
    }

    #[test]
    fn test_lookup_agent_creation() {
        let agent = create_profile_lookup_agent(DEFAULT_MAX_ITERATIONS);

        assert_eq!(agent.id, "profile_lookup");
        assert_eq!(agent.temperature, 0.0);
        assert_eq!(agent.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(agent.instructions.contains("Never invent"));
    }

    #[test]
    fn test_lookup_task_wording() {
        let task = lookup_task("Eden Marco");
        assert!(task.starts_with("Given the full name Eden Marco, find the URL"));
        assert!(task.ends_with("Your answer should contain only the URL."));
    }

    #[tokio::test]
    async fn test_resolves_url_from_tool_observation() {
        let step = format!(
            "Thought: I should search for the profile\nAction: {}\nAction Input: Eden Marco",
            SEARCH_TOOL_NAME
        );
        let llm = Arc::new(ScriptedLlm::new(vec![
            step.as_str(),
            "Thought: I now know the final answer\nFinal Answer: https://www.linkedin.com/in/eden-marco/",
        ]));
        let provider = provider_returning(&["https://www.linkedin.com/in/eden-marco/"]);

        let resolver = ProfileUrlResolver::new(llm.clone(), Arc::new(provider), 5);
        let url = resolver.resolve("Eden Marco").await.unwrap();

        assert_eq!(
            url,
            ProfileUrl::Found("https://www.linkedin.com/in/eden-marco/".to_string())
        );
        let requests = llm.requests();
        let first_prompt = &requests[0].messages.last().unwrap().content;
        assert!(first_prompt.contains("Given the full name Eden Marco"));
    }

    #[tokio::test]
    async fn test_unknown_person_resolves_to_not_found() {
        let step = format!(
            "Action: {}\nAction Input: Totally Unknown Person XYZ123",
            SEARCH_TOOL_NAME
        );
        let llm = Arc::new(ScriptedLlm::new(vec![
            step.as_str(),
            "Thought: I now know the final answer\nFinal Answer: LinkedIn profile not found.",
        ]));
        let provider = provider_returning(&["https://example.com/xyz123"]);

        let resolver = ProfileUrlResolver::new(llm, Arc::new(provider), 5);
        let url = resolver.resolve("Totally Unknown Person XYZ123").await.unwrap();

        assert_eq!(url, ProfileUrl::NotFound);
    }

    #[tokio::test]
    async fn test_iteration_limit_resolves_to_not_found() {
        let step = format!("Action: {}\nAction Input: Someone", SEARCH_TOOL_NAME);
        let llm = Arc::new(ScriptedLlm::repeating(&step));
        let provider = provider_returning(&[]);

        let resolver = ProfileUrlResolver::new(llm.clone(), Arc::new(provider), 2);
        let url = resolver.resolve("Someone").await.unwrap();

        assert_eq!(url, ProfileUrl::NotFound);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_llm_failure_is_an_error() {
        let llm = Arc::new(ScriptedLlm::failing("HTTP 401"));
        let mut provider = MockSearchProvider::new();
        provider.expect_search().times(0);

        let resolver = ProfileUrlResolver::new(llm, Arc::new(provider), 5);
        let err = resolver.resolve("Eden Marco").await.unwrap_err();

        assert!(matches!(err, IcebreakerError::Agent(AgentError::Llm(_))));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_llm_call() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let resolver = ProfileUrlResolver::new(llm.clone(), Arc::new(MockSearchProvider::new()), 5);

        assert!(matches!(
            resolver.resolve("   ").await,
            Err(IcebreakerError::InvalidInput(_))
        ));
        assert_eq!(llm.call_count(), 0);
    }
}
