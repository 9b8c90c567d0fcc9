// Tool definitions advertised to the reasoning agent
//
// The agent speaks the text ReAct protocol ("Action: <name>" followed by
// "Action Input: <text>"), so a tool is described by its name and a
// one-line description that tells the model when to call it.

use serde::{Deserialize, Serialize};

/// A capability the agent may invoke by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Identifier the model must echo on the `Action:` line
    pub name: String,

    /// What the tool does and what input it expects
    pub description: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Render a tool list as "name: description" lines for the prompt
    pub fn render_all(tools: &[ToolDefinition]) -> String {
        tools
            .iter()
            .map(|t| format!("{}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma-separated tool names, as listed on the `Action:` format line
    pub fn names(tools: &[ToolDefinition]) -> String {
        tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Look up a tool by the name the model produced
    ///
    /// Models sometimes wrap the name in quotes or backticks; those are ignored.
    pub fn find<'a>(tools: &'a [ToolDefinition], requested: &str) -> Option<&'a ToolDefinition> {
        let requested = requested.trim().trim_matches(|c| c == '"' || c == '`' || c == '\'');
        tools.iter().find(|t| t.name == requested)
    }
}
