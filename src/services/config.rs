// Configuration service implementation
//
// All settings come from environment variables, optionally seeded from a
// .env file via dotenvy. Secrets never live in files under version control.
// Values are read once and cached; the service is immutable afterwards.

use super::traits::ConfigService;
use crate::agent::DEFAULT_MAX_ITERATIONS;
use crate::error::{IcebreakerError, Result};
use crate::llm::LlmProvider;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Environment-backed configuration
///
/// Environment Variables:
/// - LLM_PROVIDER (optional): deepseek, openai or openrouter; defaults to deepseek
/// - DEEPSEEK_API_KEY / OPENAI_API_KEY / OPENROUTER_API_KEY (required, per
///   provider): language-model API key
/// - LLM_API_BASE (optional): defaults to the provider's base URL
/// - LLM_MODEL (optional): defaults to the provider's model
/// - TAVILY_API_KEY (required): search API key
/// - TAVILY_ENDPOINT (optional): search endpoint override
/// - SCRAPIN_API_KEY (optional): enrichment API key, needed for live fetches
/// - SCRAPIN_ENDPOINT (optional): enrichment endpoint override
/// - AGENT_MAX_ITERATIONS (optional): lookup agent limit, defaults to 15
/// - ICEBREAKER_BIND (optional): web form address, defaults to 127.0.0.1:5000
#[derive(Debug, Clone)]
pub struct EnvConfigService {
    llm_provider: LlmProvider,
    llm_api_key: String,
    llm_api_base: String,
    llm_model: String,
    search_api_key: String,
    search_endpoint: Option<String>,
    enrichment_api_key: Option<String>,
    enrichment_endpoint: Option<String>,
    agent_max_iterations: usize,
    bind_addr: String,
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name).ok_or_else(|| {
        IcebreakerError::EnvError(format!(
            "{} is missing. Add it to the environment or the .env file",
            name
        ))
    })
}

impl EnvConfigService {
    /// Load configuration from the environment
    ///
    /// Loads .env first (ignored if absent). Fails on the first missing
    /// required credential, before anything talks to the network.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let provider = match optional_var("LLM_PROVIDER") {
            Some(raw) => raw.parse::<LlmProvider>()?,
            None => LlmProvider::DeepSeek,
        };
        let llm_api_key = required_var(provider.default_env_var())?;
        let search_api_key = required_var("TAVILY_API_KEY")?;

        let agent_max_iterations = match optional_var("AGENT_MAX_ITERATIONS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(IcebreakerError::ConfigError(format!(
                        "AGENT_MAX_ITERATIONS must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_MAX_ITERATIONS,
        };

        Ok(Self {
            llm_provider: provider,
            llm_api_key,
            llm_api_base: optional_var("LLM_API_BASE")
                .unwrap_or_else(|| provider.default_api_base().to_string()),
            llm_model: optional_var("LLM_MODEL")
                .unwrap_or_else(|| provider.default_model().to_string()),
            search_api_key,
            search_endpoint: optional_var("TAVILY_ENDPOINT"),
            enrichment_api_key: Self::enrichment_key_from_env(),
            enrichment_endpoint: optional_var("SCRAPIN_ENDPOINT"),
            agent_max_iterations,
            bind_addr: optional_var("ICEBREAKER_BIND")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    /// Enrichment key alone, for callers that only fetch profiles
    pub fn enrichment_key_from_env() -> Option<String> {
        optional_var("SCRAPIN_API_KEY")
    }
}

impl ConfigService for EnvConfigService {
    fn llm_provider(&self) -> LlmProvider {
        self.llm_provider
    }

    fn llm_api_key(&self) -> Result<String> {
        Ok(self.llm_api_key.clone())
    }

    fn llm_api_base(&self) -> String {
        self.llm_api_base.clone()
    }

    fn llm_model(&self) -> String {
        self.llm_model.clone()
    }

    fn search_api_key(&self) -> Result<String> {
        Ok(self.search_api_key.clone())
    }

    fn search_endpoint(&self) -> Option<String> {
        self.search_endpoint.clone()
    }

    fn enrichment_api_key(&self) -> Result<String> {
        self.enrichment_api_key.clone().ok_or_else(|| {
            IcebreakerError::EnvError(
                "SCRAPIN_API_KEY is missing. It is required for live profile fetches".to_string(),
            )
        })
    }

    fn enrichment_endpoint(&self) -> Option<String> {
        self.enrichment_endpoint.clone()
    }

    fn agent_max_iterations(&self) -> usize {
        self.agent_max_iterations
    }

    fn bind_addr(&self) -> String {
        self.bind_addr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize config tests to avoid env var conflicts
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: &[&str] = &[
        "LLM_PROVIDER",
        "DEEPSEEK_API_KEY",
        "OPENAI_API_KEY",
        "OPENROUTER_API_KEY",
        "LLM_API_BASE",
        "LLM_MODEL",
        "TAVILY_API_KEY",
        "TAVILY_ENDPOINT",
        "SCRAPIN_API_KEY",
        "SCRAPIN_ENDPOINT",
        "AGENT_MAX_ITERATIONS",
        "ICEBREAKER_BIND",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_config_requires_llm_key() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("TAVILY_API_KEY", "tvly-test");

        match EnvConfigService::load() {
            Err(IcebreakerError::EnvError(msg)) => assert!(msg.contains("DEEPSEEK_API_KEY")),
            other => panic!("Expected EnvError, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("DEEPSEEK_API_KEY", "sk-test");
        std::env::set_var("TAVILY_API_KEY", "   ");

        match EnvConfigService::load() {
            Err(IcebreakerError::EnvError(msg)) => assert!(msg.contains("TAVILY_API_KEY")),
            other => panic!("Expected EnvError, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    fn test_config_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("DEEPSEEK_API_KEY", "sk-test");
        std::env::set_var("TAVILY_API_KEY", "tvly-test");

        let config = EnvConfigService::load().unwrap();

        assert_eq!(config.llm_provider(), LlmProvider::DeepSeek);
        assert_eq!(config.llm_api_key().unwrap(), "sk-test");
        assert_eq!(config.llm_api_base(), "https://api.deepseek.com/v1");
        assert_eq!(config.llm_model(), "deepseek-chat");
        assert_eq!(config.search_api_key().unwrap(), "tvly-test");
        assert!(config.search_endpoint().is_none());
        assert!(config.enrichment_api_key().is_err());
        assert_eq!(config.agent_max_iterations(), DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.bind_addr(), DEFAULT_BIND_ADDR);

        clear_env();
    }

    #[test]
    fn test_config_with_custom_values() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("DEEPSEEK_API_KEY", "sk-custom");
        std::env::set_var("TAVILY_API_KEY", "tvly-custom");
        std::env::set_var("SCRAPIN_API_KEY", "scrapin-custom");
        std::env::set_var("LLM_API_BASE", "http://localhost:8080/v1");
        std::env::set_var("LLM_MODEL", "deepseek-reasoner");
        std::env::set_var("AGENT_MAX_ITERATIONS", "4");
        std::env::set_var("ICEBREAKER_BIND", "0.0.0.0:8000");

        let config = EnvConfigService::load().unwrap();

        assert_eq!(config.enrichment_api_key().unwrap(), "scrapin-custom");
        assert_eq!(config.llm_api_base(), "http://localhost:8080/v1");
        assert_eq!(config.llm_model(), "deepseek-reasoner");
        assert_eq!(config.agent_max_iterations(), 4);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");

        clear_env();
    }

    #[test]
    fn test_provider_selects_key_and_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("LLM_PROVIDER", "openai");
        std::env::set_var("DEEPSEEK_API_KEY", "sk-deepseek");
        std::env::set_var("TAVILY_API_KEY", "tvly-test");

        match EnvConfigService::load() {
            Err(IcebreakerError::EnvError(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("Expected EnvError, got {:?}", other),
        }

        std::env::set_var("OPENAI_API_KEY", "sk-openai");
        let config = EnvConfigService::load().unwrap();

        assert_eq!(config.llm_provider(), LlmProvider::OpenAI);
        assert_eq!(config.llm_api_key().unwrap(), "sk-openai");
        assert_eq!(config.llm_api_base(), "https://api.openai.com/v1");
        assert_eq!(config.llm_model(), "gpt-4o-mini");

        clear_env();
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("LLM_PROVIDER", "anthropic");
        std::env::set_var("DEEPSEEK_API_KEY", "sk-test");
        std::env::set_var("TAVILY_API_KEY", "tvly-test");

        match EnvConfigService::load() {
            Err(err @ IcebreakerError::ConfigError(_)) => assert!(err.is_configuration()),
            other => panic!("Expected ConfigError, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    fn test_invalid_iteration_limit() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("DEEPSEEK_API_KEY", "sk-test");
        std::env::set_var("TAVILY_API_KEY", "tvly-test");
        std::env::set_var("AGENT_MAX_ITERATIONS", "0");

        assert!(matches!(
            EnvConfigService::load(),
            Err(IcebreakerError::ConfigError(_))
        ));

        clear_env();
    }
}
