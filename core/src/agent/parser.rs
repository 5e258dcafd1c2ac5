//! Parser for zero-shot ReAct model output

use crate::error::AgentError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const FINAL_ANSWER_ACTION: &str = "Final Answer:";

const MISSING_ACTION_AFTER_THOUGHT: &str = "Invalid Format: Missing 'Action:' after 'Thought:'";
const MISSING_ACTION_INPUT_AFTER_ACTION: &str =
    "Invalid Format: Missing 'Action Input:' after 'Action:'";
const FINAL_ANSWER_AND_PARSABLE_ACTION: &str =
    "Parsing LLM output produced both a final answer and a parse-able action";

/// A tool invocation chosen by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    /// Raw model text that produced this action
    pub log: String,
}

/// The model's final answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFinish {
    pub output: String,
    pub log: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutput {
    Action(AgentAction),
    Finish(AgentFinish),
}

/// Model output that fits neither an action nor a final answer
#[derive(Debug, Clone, PartialEq)]
pub struct OutputParseError {
    pub message: String,
    /// Hint to send back to the model, when there is a useful one
    pub observation: Option<String>,
    pub llm_output: String,
}

impl From<OutputParseError> for AgentError {
    fn from(err: OutputParseError) -> Self {
        AgentError::OutputParsing {
            message: err.message,
            llm_output: err.llm_output,
        }
    }
}

fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
            .expect("static regex")
    })
}

fn action_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)").expect("static regex"))
}

fn action_input_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)").expect("static regex")
    })
}

/// Parse one model completion into an action or a final answer
pub fn parse(text: &str) -> Result<ParsedOutput, OutputParseError> {
    let final_answer_at = text.find(FINAL_ANSWER_ACTION);
    let action = action_regex().captures(text);

    if let (Some(answer_at), Some(captures)) = (final_answer_at, action.as_ref()) {
        let action_at = captures.get(0).map(|m| m.start()).unwrap_or(0);
        if answer_at < action_at {
            // Answer came first; the action after it is hallucinated.
            let start = answer_at + FINAL_ANSWER_ACTION.len();
            let end = text[start..]
                .find("\n\n")
                .map(|i| start + i)
                .unwrap_or(text.len());
            return Ok(ParsedOutput::Finish(AgentFinish {
                output: text[start..end].trim().to_string(),
                log: text[..end].to_string(),
            }));
        }
        return Err(OutputParseError {
            message: format!("{}: {}", FINAL_ANSWER_AND_PARSABLE_ACTION, text),
            observation: None,
            llm_output: text.to_string(),
        });
    }

    if let Some(captures) = action {
        let tool = captures.get(1).map_or("", |m| m.as_str()).trim();
        let raw_input = captures.get(2).map_or("", |m| m.as_str());
        let tool_input = raw_input.trim_matches(' ').trim_matches('"').trim();

        return Ok(ParsedOutput::Action(AgentAction {
            tool: tool.to_string(),
            tool_input: tool_input.to_string(),
            log: text.to_string(),
        }));
    }

    if let Some(answer_at) = text.rfind(FINAL_ANSWER_ACTION) {
        // A repeated marker means the model revised itself; the last one counts.
        let output = text[answer_at + FINAL_ANSWER_ACTION.len()..].trim();
        return Ok(ParsedOutput::Finish(AgentFinish {
            output: output.to_string(),
            log: text.to_string(),
        }));
    }

    let observation = if !action_only_regex().is_match(text) {
        Some(MISSING_ACTION_AFTER_THOUGHT.to_string())
    } else if !action_input_regex().is_match(text) {
        Some(MISSING_ACTION_INPUT_AFTER_ACTION.to_string())
    } else {
        None
    };

    Err(OutputParseError {
        message: format!("Could not parse LLM output: `{}`", text),
        observation,
        llm_output: text.to_string(),
    })
}
