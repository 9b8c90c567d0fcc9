// Centralized error handling using thiserror for type-safe error management
//
// Every component returns `Result<T>` with `IcebreakerError`. Stage-specific
// failures (profile fetch, agent loop) carry their own enums so the pipeline
// can log the exact cause before degrading.

use thiserror::Error;

use crate::agent::AgentError;
use crate::profile::FetchError;

/// Main error type for the icebreaker crate
///
/// Error Handling Strategy:
/// - Configuration errors: raised before any network call (missing keys, bad values)
/// - Transport errors: typed per upstream (LLM, search, enrichment)
/// - Parse errors: structured output that does not match the summary schema
#[derive(Debug, Error)]
pub enum IcebreakerError {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or invalid environment variable (API keys, etc.)
    #[error("Environment error: {0}")]
    EnvError(String),

    /// Caller supplied input that cannot be processed (e.g. a blank name)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// LLM adapter or communication error
    ///
    /// Includes connection failures, non-2xx responses and empty completions.
    #[error("LLM error: {0}")]
    LlmError(String),

    /// Search provider error (transport, non-2xx, bad payload)
    #[error("Search error: {0}")]
    SearchError(String),

    /// Tool invoked by the agent failed or does not exist
    #[error("Tool error: {0}")]
    ToolError(String),

    /// Model output could not be parsed into the expected structure
    #[error("Output parse error: {0}")]
    OutputParseError(String),

    /// Profile enrichment failed
    #[error("Profile fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The reasoning agent could not produce an answer
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// IO operation failed (socket bind, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

/// Type alias for Result with IcebreakerError
pub type Result<T> = std::result::Result<T, IcebreakerError>;

impl IcebreakerError {
    /// True for errors an operator has to fix before the process can work
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            IcebreakerError::ConfigError(_)
                | IcebreakerError::EnvError(_)
                | IcebreakerError::Fetch(FetchError::MissingApiKey)
        )
    }
}
