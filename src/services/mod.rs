// Service layer for dependency injection and testability
//
// Architecture Pattern: Ports and Adapters
// - traits.rs defines the ports the pipeline depends on
// - config.rs is the environment-backed ConfigService adapter
// - the HTTP-backed adapters live next to their domain (profile, search,
//   agents, summary) and implement these traits
//
// Usage Example:
//     // Production code
//     let config = Arc::new(EnvConfigService::load()?);
//     let icebreaker = IceBreaker::from_config(config, FetchMode::Live)?;
//
//     // Test code
//     let mut resolver = MockUrlResolver::new();
//     resolver.expect_resolve().returning(|_| Ok(ProfileUrl::NotFound));

pub mod config;
#[cfg(test)]
pub mod mocks;
pub mod traits;

// Re-export commonly used types
pub use config::EnvConfigService;
pub use traits::{ConfigService, ProfileSource, SummaryService, UrlResolver};
