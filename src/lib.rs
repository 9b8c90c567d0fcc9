// Library interface for icebreaker
// This exposes the pipeline as a library that can be:
// - Driven from the CLI and the web form
// - Called from integration tests with stubbed stages
// - Embedded in other applications

pub mod agent;
pub mod agents;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod profile;
pub mod search;
pub mod server;
pub mod services;
pub mod summary;
pub mod tool_executor;
pub mod version;

// Re-export commonly used types for convenience
pub use agent::{Agent, AgentConfig, AgentError};
pub use error::{IcebreakerError, Result};
pub use llm::{LlmAdapter, LlmProvider, LlmRequest, LlmResponse, Message as LlmMessage};
pub use pipeline::{IceBreaker, IceBreakerBuilder, NoDataReason, PipelineOutcome};
pub use profile::{FetchMode, ProfileRecord, ProfileUrl};
pub use services::{ConfigService, EnvConfigService, ProfileSource, SummaryService, UrlResolver};
pub use summary::Summary;
