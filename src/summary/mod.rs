// Structured summary of a profile: a short bio plus interesting facts
//
// Module Organization:
// - this file: the Summary schema, its format instructions and output parser
// - generator.rs: the LLM-backed SummaryGenerator

pub mod generator;

use crate::error::{IcebreakerError, Result};
use serde::{Deserialize, Serialize};

pub use generator::SummaryGenerator;

/// Shown when the pipeline had no profile data to summarize
pub const NO_DATA_SUMMARY: &str = "No LinkedIn data found.";

/// Shown when the model call or its output failed
pub const GENERATION_ERROR_SUMMARY: &str = "Error generating summary.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Short biography
    pub summary: String,

    /// Interesting facts about the person; required, may be empty
    pub facts: Vec<String>,
}

impl Summary {
    pub fn new(summary: impl Into<String>, facts: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            facts,
        }
    }

    pub fn no_data() -> Self {
        Self::new(NO_DATA_SUMMARY, Vec::new())
    }

    pub fn generation_error() -> Self {
        Self::new(GENERATION_ERROR_SUMMARY, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
    }
}

/// Output instructions appended to the summary prompt
pub fn format_instructions() -> String {
    let schema = serde_json::json!({
        "properties": {
            "summary": {"title": "Summary", "description": "summary", "type": "string"},
            "facts": {
                "title": "Facts",
                "description": "interesting facts about them",
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": ["summary", "facts"]
    });

    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n\
         As an example, for the schema {{\"properties\": {{\"foo\": {{\"title\": \"Foo\", \"description\": \"a list of strings\", \"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}\n\
         the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema. \
         The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.\n\n\
         Here is the output schema:\n```json\n{}\n```",
        schema
    )
}

/// First balanced `{...}` object in `text`, honoring string literals
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse model output into a `Summary`
///
/// Accepts bare JSON, JSON inside a ```json fence, or JSON surrounded by
/// prose. The first balanced object is used.
pub fn parse_summary(text: &str) -> Result<Summary> {
    let object = first_json_object(text).ok_or_else(|| {
        IcebreakerError::OutputParseError(format!("no JSON object in model output: {}", text.trim()))
    })?;

    let summary: Summary = serde_json::from_str(object)
        .map_err(|e| IcebreakerError::OutputParseError(format!("{}: {}", e, object)))?;

    if summary.is_empty() {
        return Err(IcebreakerError::OutputParseError(
            "model returned an empty summary".to_string(),
        ));
    }
    Ok(summary)
}
