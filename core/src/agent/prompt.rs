//! Zero-shot ReAct prompt construction

use crate::tools::ToolExecutor;

pub const PROMPT_PREFIX: &str =
    "Answer the following questions as best you can. You have access to the following tools:";

pub const FORMAT_INSTRUCTIONS: &str = "Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question";

pub const PROMPT_SUFFIX: &str = "Begin!

Question: {input}
Thought:{agent_scratchpad}";

pub const OBSERVATION_PREFIX: &str = "Observation: ";
pub const LLM_PREFIX: &str = "Thought:";

/// Sequences the model must stop at so it never invents observations
pub fn stop_sequences() -> Vec<String> {
    vec![
        format!("\n{}", OBSERVATION_PREFIX.trim_end()),
        format!("\n\t{}", OBSERVATION_PREFIX.trim_end()),
    ]
}

/// Build the prompt template with tool descriptions filled in.
///
/// `{input}` and `{agent_scratchpad}` are left for [`render_prompt`].
pub fn create_prompt(tools: &ToolExecutor) -> String {
    let tool_strings = tools
        .tools()
        .map(|tool| format!("{}: {}", tool.name(), tool.description()))
        .collect::<Vec<_>>()
        .join("\n");

    let format_instructions =
        FORMAT_INSTRUCTIONS.replace("{tool_names}", &tools.list_tools().join(", "));

    [PROMPT_PREFIX, &tool_strings, &format_instructions, PROMPT_SUFFIX].join("\n\n")
}

/// Fill the question and scratchpad into a template from [`create_prompt`]
pub fn render_prompt(template: &str, question: &str, scratchpad: &str) -> String {
    // Scratchpad first: the question is user text and may itself contain "{agent_scratchpad}".
    template
        .replacen("{agent_scratchpad}", scratchpad, 1)
        .replacen("{input}", question, 1)
}

/// Append one action/observation round to the scratchpad
pub fn append_step(scratchpad: &mut String, log: &str, observation: &str) {
    scratchpad.push_str(log);
    scratchpad.push('\n');
    scratchpad.push_str(OBSERVATION_PREFIX);
    scratchpad.push_str(observation);
    scratchpad.push('\n');
    scratchpad.push_str(LLM_PREFIX);
}
