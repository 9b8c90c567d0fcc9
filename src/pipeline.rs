// Ice-breaker pipeline: name -> profile URL -> profile record -> summary
//
// IceBreaker only sees the service traits, so every stage can be swapped.
// IceBreakerBuilder wires the HTTP-backed stages from a ConfigService, or
// takes explicit overrides for tests.
//
// Usage Example:
//     // Production
//     let config = Arc::new(EnvConfigService::load()?);
//     let icebreaker = IceBreakerBuilder::new()
//         .with_config(config)
//         .with_production_deps()?
//         .build()?;
//     let summary = icebreaker.run("Eden Marco").await;
//
//     // Testing
//     let icebreaker = IceBreakerBuilder::new()
//         .with_resolver(Arc::new(resolver))
//         .with_profile_source(Arc::new(source))
//         .with_summary_service(Arc::new(summaries))
//         .build()?;

use crate::agents::ProfileUrlResolver;
use crate::error::{IcebreakerError, Result};
use crate::llm::{create_adapter, LlmAdapter};
use crate::profile::{FetchMode, ProfileFetcher, ProfileUrl};
use crate::search::{SearchProvider, TavilySearchProvider};
use crate::services::{ConfigService, ProfileSource, SummaryService, UrlResolver};
use crate::summary::{Summary, SummaryGenerator};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Why a run ended without profile data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum NoDataReason {
    /// Empty or whitespace-only name
    InvalidName,
    /// The resolver found no profile URL
    ProfileNotFound,
    ResolveFailed(String),
    FetchFailed(String),
    /// The fetched record had no attributes left after filtering
    EmptyRecord,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::InvalidName => f.write_str("name is empty"),
            NoDataReason::ProfileNotFound => f.write_str("no profile URL found"),
            NoDataReason::ResolveFailed(e) => write!(f, "profile lookup failed: {}", e),
            NoDataReason::FetchFailed(e) => write!(f, "profile fetch failed: {}", e),
            NoDataReason::EmptyRecord => f.write_str("profile record is empty"),
        }
    }
}

/// Terminal state of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Success {
        profile_url: String,
        summary: Summary,
    },
    NoData {
        reason: NoDataReason,
    },
    GenerationFailed {
        profile_url: String,
        error: String,
    },
}

impl PipelineOutcome {
    /// The user-visible summary for this outcome
    pub fn summary(&self) -> Summary {
        self.clone().into_summary()
    }

    pub fn into_summary(self) -> Summary {
        match self {
            PipelineOutcome::Success { summary, .. } => summary,
            PipelineOutcome::NoData { .. } => Summary::no_data(),
            PipelineOutcome::GenerationFailed { .. } => Summary::generation_error(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }
}

/// The orchestrator
pub struct IceBreaker {
    resolver: Arc<dyn UrlResolver>,
    profile_source: Arc<dyn ProfileSource>,
    summary_service: Arc<dyn SummaryService>,
    fetch_mode: FetchMode,
}

impl IceBreaker {
    /// Wire the production stages from configuration
    ///
    /// # Errors
    /// - Missing credentials (live mode also needs the enrichment key)
    pub fn from_config(config: Arc<dyn ConfigService>, fetch_mode: FetchMode) -> Result<Self> {
        IceBreakerBuilder::new()
            .with_config(config)
            .fetch_mode(fetch_mode)
            .with_production_deps()?
            .build()
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Run the pipeline and return the user-visible summary
    ///
    /// Never fails: missing data and generation errors come back as the
    /// corresponding degraded summaries.
    pub async fn run(&self, name: &str) -> Summary {
        self.run_detailed(name).await.into_summary()
    }

    /// Run the pipeline and report which terminal state it reached
    pub async fn run_detailed(&self, name: &str) -> PipelineOutcome {
        let name = name.trim();
        if name.is_empty() {
            warn!("Rejecting empty name");
            return PipelineOutcome::NoData {
                reason: NoDataReason::InvalidName,
            };
        }

        info!("Ice breaking with '{}'", name);

        let profile_url = match self.resolver.resolve(name).await {
            Ok(ProfileUrl::Found(url)) => url,
            Ok(ProfileUrl::NotFound) => {
                info!("No profile URL for '{}'", name);
                return PipelineOutcome::NoData {
                    reason: NoDataReason::ProfileNotFound,
                };
            }
            Err(e) => {
                warn!("Profile lookup for '{}' failed: {}", name, e);
                return PipelineOutcome::NoData {
                    reason: NoDataReason::ResolveFailed(e.to_string()),
                };
            }
        };
        info!("Resolved '{}' to {}", name, profile_url);

        let record = match self.profile_source.fetch(&profile_url, self.fetch_mode).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Profile fetch for {} failed: {}", profile_url, e);
                return PipelineOutcome::NoData {
                    reason: NoDataReason::FetchFailed(e.to_string()),
                };
            }
        };

        if record.is_empty() {
            warn!("Profile record for {} is empty", profile_url);
            return PipelineOutcome::NoData {
                reason: NoDataReason::EmptyRecord,
            };
        }
        info!(
            "Fetched profile of {}",
            record.full_name().as_deref().unwrap_or("unknown")
        );

        match self.summary_service.try_generate(&record).await {
            Ok(summary) => {
                info!("Summary ready for '{}'", name);
                PipelineOutcome::Success {
                    profile_url,
                    summary,
                }
            }
            Err(e) => {
                error!("Summary generation for '{}' failed: {}", name, e);
                PipelineOutcome::GenerationFailed {
                    profile_url,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Builder for IceBreaker with dependency injection
pub struct IceBreakerBuilder {
    config: Option<Arc<dyn ConfigService>>,
    resolver: Option<Arc<dyn UrlResolver>>,
    profile_source: Option<Arc<dyn ProfileSource>>,
    summary_service: Option<Arc<dyn SummaryService>>,
    fetch_mode: FetchMode,
}

impl IceBreakerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            resolver: None,
            profile_source: None,
            summary_service: None,
            fetch_mode: FetchMode::default(),
        }
    }

    pub fn with_config(mut self, config: Arc<dyn ConfigService>) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the resolver (for testing)
    pub fn with_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Override the profile source (for testing)
    pub fn with_profile_source(mut self, source: Arc<dyn ProfileSource>) -> Self {
        self.profile_source = Some(source);
        self
    }

    /// Override the summary service (for testing)
    pub fn with_summary_service(mut self, service: Arc<dyn SummaryService>) -> Self {
        self.summary_service = Some(service);
        self
    }

    pub fn fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    /// Build every stage not already overridden from the configuration
    ///
    /// One LLM adapter is shared by the lookup agent and the generator.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No config service was provided
    /// - A required API key is missing
    /// - An HTTP client cannot be built
    pub fn with_production_deps(mut self) -> Result<Self> {
        let config = self
            .config
            .clone()
            .ok_or_else(|| IcebreakerError::ConfigError("Config not configured".to_string()))?;

        let needs_llm = self.resolver.is_none() || self.summary_service.is_none();
        let llm: Option<Arc<dyn LlmAdapter>> = if needs_llm {
            Some(Arc::from(create_adapter(
                config.llm_provider(),
                config.llm_api_key()?,
                Some(config.llm_api_base()),
                Some(config.llm_model()),
            )))
        } else {
            None
        };

        if self.resolver.is_none() {
            let search = Arc::new(TavilySearchProvider::new(
                config.search_api_key()?,
                config.search_endpoint(),
            )?) as Arc<dyn SearchProvider>;
            if let Some(llm) = &llm {
                self.resolver = Some(Arc::new(ProfileUrlResolver::new(
                    llm.clone(),
                    search,
                    config.agent_max_iterations(),
                )));
            }
        }

        if self.profile_source.is_none() {
            let api_key = match self.fetch_mode {
                FetchMode::Live => Some(config.enrichment_api_key()?),
                FetchMode::Mock => config.enrichment_api_key().ok(),
            };
            let mut fetcher = ProfileFetcher::new(api_key)?;
            if let Some(endpoint) = config.enrichment_endpoint() {
                fetcher = fetcher.with_endpoint(endpoint);
            }
            self.profile_source = Some(Arc::new(fetcher));
        }

        if self.summary_service.is_none() {
            if let Some(llm) = &llm {
                self.summary_service = Some(Arc::new(
                    SummaryGenerator::new(llm.clone()).with_model(config.llm_model()),
                ));
            }
        }

        Ok(self)
    }

    /// Validate that every stage is present
    ///
    /// # Errors
    ///
    /// Returns error if any stage is missing.
    pub fn build(self) -> Result<IceBreaker> {
        Ok(IceBreaker {
            resolver: self
                .resolver
                .ok_or_else(|| IcebreakerError::ConfigError("Resolver not configured".to_string()))?,
            profile_source: self.profile_source.ok_or_else(|| {
                IcebreakerError::ConfigError("Profile source not configured".to_string())
            })?,
            summary_service: self.summary_service.ok_or_else(|| {
                IcebreakerError::ConfigError("Summary service not configured".to_string())
            })?,
            fetch_mode: self.fetch_mode,
        })
    }
}

impl Default for IceBreakerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
