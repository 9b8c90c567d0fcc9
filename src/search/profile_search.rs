// The lookup agent's only tool: site-scoped search for a LinkedIn profile URL

use super::{SearchProvider, SearchQuery, SearchResult};
use crate::agent::ToolDefinition;
use crate::error::{IcebreakerError, Result};
use crate::profile::{PROFILE_NOT_FOUND, PROFILE_PATH_PATTERN};
use crate::tool_executor::ToolExecutor;
use async_trait::async_trait;
use std::sync::Arc;

pub const SEARCH_TOOL_NAME: &str = "search_linkedin_profile";

/// First result pointing at a member profile, if any
pub fn first_profile_url(results: &[SearchResult]) -> Option<&str> {
    results
        .iter()
        .map(|r| r.url.as_str())
        .find(|url| url.contains(PROFILE_PATH_PATTERN))
}

/// Searches `"<name> site:linkedin.com/in"` and answers with the first
/// profile URL, or the not-found sentinel.
pub struct ProfileSearchTool {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl ProfileSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            max_results: 5,
        }
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            SEARCH_TOOL_NAME,
            "Searches for a LinkedIn profile URL based on a person's full name. \
             Input is the full name only. Returns the profile URL, or \
             \"LinkedIn profile not found.\" when there is no match.",
        )
    }

    /// Run one site-scoped search for `name`
    pub async fn search_profile(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IcebreakerError::InvalidInput(
                "search input must contain a name".to_string(),
            ));
        }

        let query = SearchQuery {
            query: format!("{} site:{}", name, PROFILE_PATH_PATTERN.trim_end_matches('/')),
            max_results: self.max_results,
        };
        let results = self.provider.search(&query).await?;

        match first_profile_url(&results) {
            Some(url) => {
                tracing::debug!("Profile search for '{}' matched {}", name, url);
                Ok(url.to_string())
            }
            None => {
                tracing::debug!(
                    "Profile search for '{}' returned {} results, none a profile",
                    name,
                    results.len()
                );
                Ok(PROFILE_NOT_FOUND.to_string())
            }
        }
    }
}

#[async_trait]
impl ToolExecutor for ProfileSearchTool {
    fn definitions(&self) -> Vec<ToolDefinition> {
        vec![Self::definition()]
    }

    async fn execute_tool(&self, tool_name: &str, arguments: &str) -> Result<String> {
        if tool_name != SEARCH_TOOL_NAME {
            return Err(IcebreakerError::ToolError(format!(
                "unknown tool '{}'",
                tool_name
            )));
        }
        self.search_profile(arguments).await
    }
}
