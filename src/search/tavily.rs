use super::{SearchProvider, SearchQuery, SearchResult};
use crate::error::{IcebreakerError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;

pub const DEFAULT_TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

/// Tavily search API client
#[derive(Debug, Clone)]
pub struct TavilySearchProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl TavilySearchProvider {
    /// Create a provider; a blank key is a configuration error
    pub fn new(api_key: String, endpoint: Option<String>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(IcebreakerError::EnvError(
                "TAVILY_API_KEY is missing. Add it to the .env file".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(crate::version::user_agent())
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_TAVILY_ENDPOINT.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    title: Option<String>,
    content: Option<String>,
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(&self, q: &SearchQuery) -> Result<Vec<SearchResult>> {
        let t0 = Instant::now();
        let max_results = q.max_results.clamp(1, 20);

        let body = serde_json::json!({
            "query": q.query,
            "max_results": max_results,
            "include_answer": false,
            "include_raw_content": false,
            "search_depth": "basic",
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IcebreakerError::SearchError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IcebreakerError::SearchError(format!(
                "tavily search HTTP {status}"
            )));
        }

        let parsed: TavilySearchResponse = resp
            .json()
            .await
            .map_err(|e| IcebreakerError::SearchError(e.to_string()))?;

        tracing::debug!(
            "tavily returned {} results for '{}' in {}ms",
            parsed.results.len(),
            q.query,
            t0.elapsed().as_millis()
        );

        Ok(parsed
            .results
            .into_iter()
            .map(|r| SearchResult {
                url: r.url,
                title: r.title,
                snippet: r.content,
            })
            .collect())
    }
}
