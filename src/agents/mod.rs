// Agent Configurations Module
// Contains pre-configured agents for the pipeline's lookup stage

pub mod profile_lookup;

// Re-export commonly used agent creators
pub use profile_lookup::{create_profile_lookup_agent, lookup_task, ProfileUrlResolver};
