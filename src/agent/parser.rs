// Parser for the text ReAct protocol
//
// A model turn is either
//   Thought: ...
//   Action: <tool name>
//   Action Input: <input>
// or
//   Thought: ...
//   Final Answer: <answer>
//
// Anything else is a format error; the loop feeds the error back to the
// model as an observation so it can correct itself on the next turn.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const OBSERVATION_MARKER: &str = "\nObservation:";

/// What the model decided to do this turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDecision {
    /// Invoke a tool and wait for its observation
    Act {
        thought: String,
        tool: String,
        input: String,
    },
    /// Stop and answer
    Finish { thought: String, answer: String },
}

/// Why a model turn could not be understood
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("Invalid format: an 'Action:' line must be followed by an 'Action Input:' line.")]
    MissingActionInput,

    #[error("Invalid format: the 'Action:' line is empty. Name one of the available tools.")]
    MissingToolName,

    #[error("Invalid format: 'Final Answer:' must be followed by the answer.")]
    EmptyAnswer,

    #[error("Invalid format: reply with either 'Action:' and 'Action Input:' lines, or a 'Final Answer:' line.")]
    Unrecognized,
}

fn action_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:[ \t]*([^\n]*)\n\s*Action\s*\d*\s*Input\s*\d*\s*:[ \t]*(.*)")
            .expect("static regex")
    })
}

/// Parse one model turn into a decision
pub fn parse_step(text: &str) -> Result<AgentDecision, ParseFailure> {
    // Models occasionally invent their own observation when the stop
    // sequence is ignored; everything from there on is discarded.
    let text = match text.find(OBSERVATION_MARKER) {
        Some(idx) => &text[..idx],
        None => text,
    };

    let final_pos = text.find(FINAL_ANSWER_MARKER);

    if let Some(caps) = action_re().captures(text) {
        let action_start = caps.get(0).map_or(0, |m| m.start());
        if final_pos.map_or(true, |f| action_start < f) {
            let tool = caps[1].trim().to_string();
            if tool.is_empty() {
                return Err(ParseFailure::MissingToolName);
            }
            return Ok(AgentDecision::Act {
                thought: extract_thought(&text[..action_start]),
                tool,
                input: clean_input(&caps[2]),
            });
        }
    }

    if let Some(pos) = final_pos {
        let answer = text[pos + FINAL_ANSWER_MARKER.len()..].trim();
        if answer.is_empty() {
            return Err(ParseFailure::EmptyAnswer);
        }
        return Ok(AgentDecision::Finish {
            thought: extract_thought(&text[..pos]),
            answer: answer.to_string(),
        });
    }

    if text.contains("Action:") {
        return Err(ParseFailure::MissingActionInput);
    }

    Err(ParseFailure::Unrecognized)
}

fn extract_thought(prefix: &str) -> String {
    let trimmed = prefix.trim();
    trimmed
        .strip_prefix("Thought:")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

// Tool inputs are single-line; quotes around them are not part of the input.
fn clean_input(raw: &str) -> String {
    raw.trim()
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches('"')
        .trim()
        .to_string()
}
