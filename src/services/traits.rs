// Core trait definitions for the pipeline's dependency injection
//
// Each pipeline stage is a port; the orchestrator only sees these traits, so
// tests swap any stage for a mock and production wires the HTTP-backed
// implementations. All traits are Send + Sync for use behind Arc in the
// tokio runtime and the web server state.

use crate::error::Result;
use crate::llm::LlmProvider;
use crate::profile::{FetchMode, ProfileRecord, ProfileUrl};
use crate::summary::Summary;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Turns a person's name into their profile URL
///
/// ```ignore
/// let resolver: Arc<dyn UrlResolver> =
///     Arc::new(ProfileUrlResolver::new(llm, search, config.agent_max_iterations()));
/// let url = resolver.resolve("Eden Marco").await?;
/// ```
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UrlResolver: Send + Sync {
    /// Resolve a name to a profile URL
    ///
    /// No match is `Ok(ProfileUrl::NotFound)`, not an error.
    ///
    /// # Errors
    /// - LLM or search transport failures
    async fn resolve(&self, name: &str) -> Result<ProfileUrl>;
}

/// Retrieves the filtered profile record behind a URL
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// # Errors
    /// - Missing enrichment key in live mode
    /// - Timeout, non-2xx, or a payload without a `person` object
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<ProfileRecord>;
}

/// Produces the bio-and-facts summary of a profile record
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SummaryService: Send + Sync {
    /// Fallible form; the orchestrator decides how to degrade
    ///
    /// # Errors
    /// - LLM call failures
    /// - Model output that does not match the summary schema
    async fn try_generate(&self, record: &ProfileRecord) -> Result<Summary>;
}

/// Configuration service for application settings
///
/// Configuration is loaded once at startup and cached in memory. Required
/// credentials are returned as `Result` so a missing key is reported before
/// any client is built.
#[cfg_attr(test, automock)]
pub trait ConfigService: Send + Sync {
    /// OpenAI-compatible provider the LLM adapter talks to
    fn llm_provider(&self) -> LlmProvider;

    /// API key for the language-model provider
    fn llm_api_key(&self) -> Result<String>;

    /// Base URL of the OpenAI-compatible endpoint
    fn llm_api_base(&self) -> String;

    /// Model identifier sent with every completion
    fn llm_model(&self) -> String;

    /// API key for the search provider
    fn search_api_key(&self) -> Result<String>;

    /// Search endpoint override, if any
    fn search_endpoint(&self) -> Option<String>;

    /// API key for the enrichment provider (needed for live fetches only)
    fn enrichment_api_key(&self) -> Result<String>;

    /// Enrichment endpoint override, if any
    fn enrichment_endpoint(&self) -> Option<String>;

    /// Iteration limit for the lookup agent
    fn agent_max_iterations(&self) -> usize;

    /// Address the web form listens on
    fn bind_addr(&self) -> String;
}
