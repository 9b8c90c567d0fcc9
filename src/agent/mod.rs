// Reasoning agent: a bounded ReAct loop over an LLM adapter and a tool executor
//
// Module Organization:
// - parser.rs: turns one model reply into an AgentDecision
// - tools.rs: ToolDefinition, the description of a capability shown to the model
// - this file: AgentConfig, the Agent runtime and its state machine
//
// The loop is an explicit state machine:
//
//   Plan ──► Decide ──► Act ──► Observe ──► Plan ...
//              │          (unknown tool / bad format go straight to Observe)
//              └──► Finish
//
// Every Plan transition costs one iteration; the run fails with
// `AgentError::MaxIterations` once the configured limit is spent.

pub mod parser;
pub mod tools;

use crate::llm::{LlmAdapter, LlmRequest, Message as LlmMessage};
use crate::tool_executor::ToolExecutor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use parser::{parse_step, AgentDecision, ParseFailure};
pub use tools::ToolDefinition;

/// Iteration limit used when the configuration does not set one
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Runtime configuration for an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique identifier for this agent (used in logs)
    pub id: String,

    /// Display name for the agent
    pub name: String,

    /// Agent-specific instructions, sent as the system message
    pub instructions: String,

    /// LLM model override; the adapter default is used when `None`
    pub model: Option<String>,

    /// Sampling temperature for every turn
    pub temperature: f32,

    /// Maximum number of model turns before giving up
    pub max_iterations: usize,
}

impl AgentConfig {
    /// Create a new agent configuration with deterministic sampling
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            instructions: String::new(),
            model: None,
            temperature: 0.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// A tool call the model asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub input: String,
}

/// One completed Thought/Action/Observation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReActStep {
    pub thought: String,

    /// `None` when the model's reply could not be parsed
    pub action: Option<ToolInvocation>,

    pub observation: String,
}

impl ReActStep {
    fn render(&self) -> String {
        let mut out = String::new();
        if !self.thought.is_empty() {
            out.push_str(&format!("Thought: {}\n", self.thought));
        }
        if let Some(action) = &self.action {
            out.push_str(&format!("Action: {}\nAction Input: {}\n", action.tool, action.input));
        }
        out.push_str(&format!("Observation: {}\n", self.observation));
        out
    }
}

/// Result of a successful agent run
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub answer: String,
    pub steps: Vec<ReActStep>,
    pub iterations: usize,
}

/// Why an agent run ended without an answer
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("language model call failed: {0}")]
    Llm(String),

    #[error("no final answer after {limit} iterations")]
    MaxIterations { limit: usize, steps: Vec<ReActStep> },

    #[error("agent has no tools to work with")]
    NoTools,
}

enum Phase {
    Plan,
    Decide {
        raw: String,
        decision: Result<AgentDecision, ParseFailure>,
    },
    Act {
        thought: String,
        invocation: ToolInvocation,
    },
    Observe(ReActStep),
}

/// A ReAct agent bound to one LLM and one set of tools
pub struct Agent {
    config: AgentConfig,
    llm_adapter: Arc<dyn LlmAdapter>,
    tools: Arc<dyn ToolExecutor>,
}

impl Agent {
    pub fn new(
        config: AgentConfig,
        llm_adapter: Arc<dyn LlmAdapter>,
        tools: Arc<dyn ToolExecutor>,
    ) -> Self {
        Self {
            config,
            llm_adapter,
            tools,
        }
    }

    /// Get the agent's ID
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Get the agent's name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    fn build_prompt(&self, task: &str, tools: &[ToolDefinition], steps: &[ReActStep]) -> String {
        let scratchpad: String = steps.iter().map(ReActStep::render).collect();

        format!(
            "Work on the task below. You can use these tools:\n\n\
             {tools}\n\n\
             Reply in exactly this format:\n\n\
             Question: the task you must complete\n\
             Thought: reason about what to do next\n\
             Action: the tool to use, one of [{names}]\n\
             Action Input: the input for the tool\n\
             Observation: the tool's result (it is given to you, never write it yourself)\n\
             ... (Thought/Action/Action Input/Observation may repeat)\n\
             Thought: I now know the final answer\n\
             Final Answer: the answer to the original question\n\n\
             Begin!\n\n\
             Question: {task}\n\
             {scratchpad}Thought:",
            tools = ToolDefinition::render_all(tools),
            names = ToolDefinition::names(tools),
            task = task,
            scratchpad = scratchpad,
        )
    }

    fn build_request(&self, task: &str, tools: &[ToolDefinition], steps: &[ReActStep]) -> LlmRequest {
        let mut messages = Vec::new();
        if !self.config.instructions.is_empty() {
            messages.push(LlmMessage::system(self.config.instructions.clone()));
        }
        messages.push(LlmMessage::user(self.build_prompt(task, tools, steps)));

        let mut request = LlmRequest::new(messages)
            .with_temperature(self.config.temperature)
            .with_stop(vec!["\nObservation:".to_string()]);
        if let Some(model) = &self.config.model {
            request = request.with_model(model.clone());
        }
        request
    }

    /// Run the loop until the model gives a final answer or the limit is hit
    pub async fn run(&self, task: &str) -> Result<AgentRun, AgentError> {
        let tools = self.tools.definitions();
        if tools.is_empty() {
            return Err(AgentError::NoTools);
        }

        let limit = self.config.max_iterations.max(1);
        let mut steps: Vec<ReActStep> = Vec::new();
        let mut iterations = 0;
        let mut phase = Phase::Plan;

        info!("Agent '{}' starting task", self.config.id);

        loop {
            phase = match phase {
                Phase::Plan => {
                    if iterations >= limit {
                        warn!(
                            "Agent '{}' hit the iteration limit ({}) without an answer",
                            self.config.id, limit
                        );
                        return Err(AgentError::MaxIterations { limit, steps });
                    }
                    iterations += 1;
                    debug!("Agent '{}' iteration {}/{}", self.config.id, iterations, limit);

                    let request = self.build_request(task, &tools, &steps);
                    let response = self
                        .llm_adapter
                        .complete_chat(request)
                        .await
                        .map_err(|e| AgentError::Llm(e.to_string()))?;
                    debug!("Raw agent output:\n{}", response.content);

                    let decision = parse_step(&response.content);
                    Phase::Decide {
                        raw: response.content,
                        decision,
                    }
                }

                Phase::Decide { decision: Ok(AgentDecision::Finish { thought, answer }), .. } => {
                    debug!("Final thought: {}", thought);
                    info!(
                        "Agent '{}' finished in {} iterations",
                        self.config.id, iterations
                    );
                    return Ok(AgentRun {
                        answer,
                        steps,
                        iterations,
                    });
                }

                Phase::Decide { decision: Ok(AgentDecision::Act { thought, tool, input }), .. } => {
                    match ToolDefinition::find(&tools, &tool) {
                        Some(definition) => Phase::Act {
                            thought,
                            invocation: ToolInvocation {
                                tool: definition.name.clone(),
                                input,
                            },
                        },
                        None => {
                            warn!("Agent requested unknown tool '{}'", tool);
                            let observation = format!(
                                "{} is not a valid tool, try one of [{}].",
                                tool,
                                ToolDefinition::names(&tools)
                            );
                            Phase::Observe(ReActStep {
                                thought,
                                action: Some(ToolInvocation { tool, input }),
                                observation,
                            })
                        }
                    }
                }

                Phase::Decide { raw, decision: Err(failure) } => {
                    warn!("Could not parse agent output: {}", failure);
                    Phase::Observe(ReActStep {
                        thought: raw.trim().to_string(),
                        action: None,
                        observation: failure.to_string(),
                    })
                }

                Phase::Act { thought, invocation } => {
                    debug!("Using tool '{}' with input '{}'", invocation.tool, invocation.input);
                    let observation = match self
                        .tools
                        .execute_tool(&invocation.tool, &invocation.input)
                        .await
                    {
                        Ok(output) => output,
                        Err(e) => {
                            warn!("Tool '{}' failed: {}", invocation.tool, e);
                            format!("Tool execution failed: {}", e)
                        }
                    };
                    Phase::Observe(ReActStep {
                        thought,
                        action: Some(invocation),
                        observation,
                    })
                }

                Phase::Observe(step) => {
                    debug!("Observation: {}", step.observation);
                    steps.push(step);
                    Phase::Plan
                }
            };
        }
    }
}
