// Web search: provider abstraction plus the profile-search tool built on it

pub mod profile_search;
pub mod tavily;

use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

pub use profile_search::{ProfileSearchTool, SEARCH_TOOL_NAME};
pub use tavily::TavilySearchProvider;

/// A web search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub max_results: usize,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 5,
        }
    }
}

/// One hit returned by a search provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Backend-agnostic web search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a query and return hits in ranking order
    ///
    /// # Errors
    /// - Transport failures and non-2xx responses (`IcebreakerError::SearchError`)
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>>;
}
