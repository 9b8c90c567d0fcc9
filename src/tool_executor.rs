// Tool execution abstraction for the reasoning agent
// Keeps the ReAct loop independent of the concrete capabilities it is given

use crate::agent::ToolDefinition;
use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Trait for executing tool calls requested by the agent
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Tools this executor can run, as advertised to the model
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Execute a tool call and return the result as a string
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool to call (e.g., "search_linkedin_profile")
    /// * `arguments` - Raw "Action Input" text produced by the model
    ///
    /// # Returns
    /// * `Result<String>` - The observation fed back to the model, or an error
    async fn execute_tool(&self, tool_name: &str, arguments: &str) -> Result<String>;
}
