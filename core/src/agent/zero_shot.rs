//! Zero-shot ReAct agent

use super::config::AgentConfig;
use super::execution::{AgentExecution, IntermediateStep};
use super::parser::{self, AgentAction, ParsedOutput};
use super::prompt;
use crate::agent::{Agent, AgentResult};
use crate::config::ModelParams;
use crate::error::AgentError;
use crate::llm::{ChatOptions, LlmClient, LlmMessage};
use crate::output::{
    AgentEvent, AgentExecutionContext, AgentOutput, TokenUsage, ToolExecutionInfo,
    ToolExecutionStatus,
};
use crate::tools::{ToolCall, ToolExecutor};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const AGENT_TYPE: &str = "zero_shot_react_description";
const EXCEPTION_TOOL: &str = "_Exception";
const GENERIC_PARSE_OBSERVATION: &str = "Invalid or incomplete response";

/// Agent that picks tools from their descriptions alone, reasoning in
/// Thought/Action/Observation rounds until it reaches a final answer
pub struct ZeroShotAgent {
    config: AgentConfig,
    llm_client: Arc<dyn LlmClient>,
    chat_options: ChatOptions,
    tool_executor: ToolExecutor,
    prompt_template: String,
    output: Box<dyn AgentOutput>,
    execution_context: Option<AgentExecutionContext>,
}

impl ZeroShotAgent {
    pub(crate) fn new(
        config: AgentConfig,
        llm_client: Arc<dyn LlmClient>,
        params: ModelParams,
        tool_executor: ToolExecutor,
        output: Box<dyn AgentOutput>,
    ) -> Self {
        let prompt_template = prompt::create_prompt(&tool_executor);
        let chat_options = ChatOptions::from_params(&params).with_stop(prompt::stop_sequences());

        Self {
            config,
            llm_client,
            chat_options,
            tool_executor,
            prompt_template,
            output,
            execution_context: None,
        }
    }

    /// Get agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Names of the tools this agent can call, in prompt order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tool_executor.list_tools()
    }

    /// Emit an event; a failing output handler never aborts the run
    async fn emit(&self, event: AgentEvent) {
        if let Err(e) = self.output.emit_event(event).await {
            debug!("Failed to emit agent event: {}", e);
        }
    }

    fn time_exhausted(&self, started: Instant) -> bool {
        self.config
            .max_execution_time_secs
            .map(|secs| started.elapsed() >= Duration::from_secs(secs))
            .unwrap_or(false)
    }

    /// Ask the model for the next Thought, given everything observed so far
    async fn plan(&mut self, question: &str, scratchpad: &str, step: usize) -> AgentResult<String> {
        let prompt = prompt::render_prompt(&self.prompt_template, question, scratchpad);

        let response = match self
            .llm_client
            .chat_completion(vec![LlmMessage::user(prompt)], Some(self.chat_options.clone()))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("LLM request failed for step {}: {}", step, e);
                let _ = self.output.error(&format!("LLM request failed: {}", e)).await;
                return Err(e);
            }
        };

        if let (Some(usage), Some(context)) = (&response.usage, &mut self.execution_context) {
            context.token_usage.add(usage);
            let token_usage = context.token_usage.clone();
            if let Err(e) = self.output.emit_token_update(token_usage).await {
                debug!("Failed to emit token update event: {}", e);
            }
        }

        Ok(truncate_at_observation(response.message.text()).to_string())
    }

    /// Run one tool action and return the observation text
    async fn act(&self, action: &AgentAction, step: usize) -> AgentResult<String> {
        if self.tool_executor.get_tool(&action.tool).is_none() {
            let observation = format!(
                "{} is not a valid tool, try one of [{}].",
                action.tool,
                self.tool_executor.list_tools().join(", ")
            );
            warn!(step, tool = %action.tool, "Model requested an unknown tool");
            return Ok(observation);
        }

        let tool_call = ToolCall::new(action.tool.as_str(), action.tool_input.as_str());
        self.emit(AgentEvent::ToolExecutionStarted {
            tool_info: ToolExecutionInfo::new(&tool_call, ToolExecutionStatus::Executing, None),
        })
        .await;

        let result = self.tool_executor.execute(tool_call.clone()).await?;

        let status = if result.success {
            ToolExecutionStatus::Success
        } else {
            ToolExecutionStatus::Error
        };
        self.emit(AgentEvent::ToolExecutionCompleted {
            tool_info: ToolExecutionInfo::new(&tool_call, status, Some(&result)),
        })
        .await;

        Ok(result.content)
    }

    /// Answer a question, returning the full execution record
    pub async fn execute(&mut self, question: &str) -> AgentResult<AgentExecution> {
        if question.trim().is_empty() {
            return Err(AgentError::InvalidQuestion {
                message: "question is empty".to_string(),
            }
            .into());
        }

        let start_time = Instant::now();
        info!(agent = AGENT_TYPE, "Answering question: {}", question);

        self.execution_context = Some(AgentExecutionContext {
            agent_id: AGENT_TYPE.to_string(),
            question: question.to_string(),
            max_iterations: self.config.max_iterations,
            current_step: 0,
            execution_time: Duration::ZERO,
            token_usage: TokenUsage::default(),
        });
        if let Some(context) = self.execution_context.clone() {
            self.emit(AgentEvent::ExecutionStarted { context }).await;
        }

        let mut scratchpad = String::new();
        let mut intermediate_steps: Vec<IntermediateStep> = Vec::new();
        let mut step = 0;
        let mut answer = None;

        while step < self.config.max_iterations && !self.time_exhausted(start_time) {
            step += 1;
            if let Some(context) = &mut self.execution_context {
                context.current_step = step;
            }

            let text = self.plan(question, &scratchpad, step).await?;
            debug!(step, "Model output: {}", text);

            let action = match parser::parse(&text) {
                Ok(ParsedOutput::Finish(finish)) => {
                    self.emit(AgentEvent::AgentFinish {
                        step_number: step,
                        log: finish.log.clone(),
                        answer: finish.output.clone(),
                    })
                    .await;
                    answer = Some(finish.output);
                    break;
                }
                Ok(ParsedOutput::Action(action)) => action,
                Err(err) if self.config.handle_parsing_errors => {
                    warn!(step, "Could not parse model output: {}", err.message);
                    let observation = err
                        .observation
                        .clone()
                        .unwrap_or_else(|| GENERIC_PARSE_OBSERVATION.to_string());
                    AgentAction {
                        tool: EXCEPTION_TOOL.to_string(),
                        tool_input: observation,
                        log: err.llm_output,
                    }
                }
                Err(err) => {
                    let _ = self.output.error(&err.message).await;
                    return Err(AgentError::from(err).into());
                }
            };

            self.emit(AgentEvent::AgentAction {
                step_number: step,
                log: action.log.clone(),
                tool: action.tool.clone(),
                tool_input: action.tool_input.clone(),
            })
            .await;

            let observation = if action.tool == EXCEPTION_TOOL {
                action.tool_input.clone()
            } else {
                self.act(&action, step).await?
            };

            self.emit(AgentEvent::Observation {
                step_number: step,
                observation: observation.clone(),
            })
            .await;

            prompt::append_step(&mut scratchpad, &action.log, &observation);
            intermediate_steps.push(IntermediateStep {
                action,
                observation,
            });
        }

        let duration = start_time.elapsed();
        let duration_ms = duration.as_millis() as u64;
        let token_usage = match &mut self.execution_context {
            Some(context) => {
                context.execution_time = duration;
                context.token_usage.clone()
            }
            None => TokenUsage::default(),
        };

        let execution = match answer {
            Some(answer) => AgentExecution::finished(answer, step, duration_ms),
            None => {
                warn!(
                    steps = step,
                    max_iterations = self.config.max_iterations,
                    "Agent stopped before reaching a final answer"
                );
                AgentExecution::stopped(step, duration_ms)
            }
        }
        .with_token_usage(token_usage)
        .with_intermediate_steps(intermediate_steps);

        if let Some(context) = self.execution_context.clone() {
            let summary = if execution.success {
                "Finished chain".to_string()
            } else {
                format!("Stopped after {} steps", step)
            };
            self.emit(AgentEvent::ExecutionCompleted {
                context,
                success: execution.success,
                summary,
            })
            .await;
        }
        let _ = self.output.flush().await;

        Ok(execution)
    }
}

/// Cut a completion at the first observation marker.
///
/// Some OpenAI-compatible servers ignore `stop`.
fn truncate_at_observation(text: &str) -> &str {
    prompt::stop_sequences()
        .iter()
        .filter_map(|stop| text.find(stop.as_str()))
        .min()
        .map_or(text, |end| &text[..end])
}

#[async_trait]
impl Agent for ZeroShotAgent {
    async fn run(&mut self, question: &str) -> AgentResult<String> {
        Ok(self.execute(question).await?.final_result)
    }

    fn agent_type(&self) -> &str {
        AGENT_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::execution::FORCE_STOP_ANSWER;
    use crate::agent::AgentBuilder;
    use crate::error::{Error, LlmError, Result};
    use crate::llm::{LlmResponse, Usage};
    use crate::output::OutputResult;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned completions and records every prompt it was sent
    struct ScriptedLlmClient {
        replies: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
        options: Mutex<Vec<ChatOptions>>,
    }

    impl ScriptedLlmClient {
        fn new(replies: Vec<&str>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
                prompts: Mutex::new(Vec::new()),
                options: Mutex::new(Vec::new()),
            })
        }

        fn failing(error: LlmError) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(VecDeque::from(vec![Err(error.into())])),
                prompts: Mutex::new(Vec::new()),
                options: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlmClient {
        async fn chat_completion(
            &self,
            messages: Vec<LlmMessage>,
            options: Option<ChatOptions>,
        ) -> Result<LlmResponse> {
            assert_eq!(messages.len(), 1);
            self.prompts.lock().unwrap().push(messages[0].content.clone());
            self.options.lock().unwrap().extend(options);

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("Thought: still thinking\nAction: EchoTool\nAction Input: again".to_string()))?;

            Ok(LlmResponse {
                message: LlmMessage::assistant(reply),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "scripted".to_string(),
                finish_reason: None,
            })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }

    #[derive(Clone, Default)]
    struct RecordingOutput {
        events: Arc<Mutex<Vec<AgentEvent>>>,
    }

    #[async_trait]
    impl AgentOutput for RecordingOutput {
        async fn emit_event(&self, event: AgentEvent) -> OutputResult {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn agent(client: Arc<ScriptedLlmClient>) -> ZeroShotAgent {
        AgentBuilder::with_client(client).build().unwrap()
    }

    #[tokio::test]
    async fn test_direct_final_answer() {
        let client = ScriptedLlmClient::new(vec![
            " I now know the final answer\nFinal Answer: Start with the official tutorial.",
        ]);
        let mut agent = agent(client.clone());

        let answer = agent.run("How do I learn Python?").await.unwrap();

        assert_eq!(answer, "Start with the official tutorial.");
        let prompts = client.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("EchoTool: Echoes the input text."));
        assert!(prompts[0].ends_with("Question: How do I learn Python?\nThought:"));
    }

    #[tokio::test]
    async fn test_tool_round_trip_feeds_observation_back() {
        let client = ScriptedLlmClient::new(vec![
            " Let me echo it.\nAction: EchoTool\nAction Input: \"practice\"",
            " I now know the final answer\nFinal Answer: Echo: practice",
        ]);
        let mut agent = agent(client.clone());

        let execution = agent.execute("Echo practice").await.unwrap();

        assert!(execution.success);
        assert_eq!(execution.final_result, "Echo: practice");
        assert_eq!(execution.steps_executed, 2);
        assert_eq!(execution.intermediate_steps.len(), 1);
        assert_eq!(execution.intermediate_steps[0].action.tool, "EchoTool");
        assert_eq!(execution.intermediate_steps[0].observation, "Echo: practice");
        assert_eq!(execution.token_usage.total_tokens, 30);

        let prompts = client.prompts();
        assert!(prompts[1].ends_with(
            "Thought: Let me echo it.\nAction: EchoTool\nAction Input: \"practice\"\nObservation: Echo: practice\nThought:"
        ));
    }

    #[tokio::test]
    async fn test_requests_use_stop_sequences() {
        let client = ScriptedLlmClient::new(vec!["Final Answer: ok"]);
        let mut agent = AgentBuilder::with_client(client.clone())
            .with_params(ModelParams {
                temperature: Some(0.0),
                ..Default::default()
            })
            .build()
            .unwrap();

        agent.run("q").await.unwrap();

        let options = client.options.lock().unwrap().clone();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].temperature, Some(0.0));
        assert_eq!(options[0].stop, Some(prompt::stop_sequences()));
    }

    #[tokio::test]
    async fn test_unknown_tool_observation() {
        let client = ScriptedLlmClient::new(vec![
            "Action: Search\nAction Input: python",
            "Final Answer: done",
        ]);
        let mut agent = agent(client.clone());

        let execution = agent.execute("q").await.unwrap();

        assert_eq!(
            execution.intermediate_steps[0].observation,
            "Search is not a valid tool, try one of [EchoTool]."
        );
        assert_eq!(execution.final_result, "done");
    }

    #[tokio::test]
    async fn test_parse_error_fails_by_default() {
        let client = ScriptedLlmClient::new(vec!["I refuse to follow the format"]);
        let mut agent = agent(client);

        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Agent(AgentError::OutputParsing { .. })
        ));
    }

    #[tokio::test]
    async fn test_parse_error_handled_as_observation() {
        let client = ScriptedLlmClient::new(vec![
            "Thought: echo it\nAction: EchoTool",
            "Final Answer: recovered",
        ]);
        let mut agent = AgentBuilder::with_client(client.clone())
            .with_agent_config(AgentConfig {
                handle_parsing_errors: true,
                ..Default::default()
            })
            .build()
            .unwrap();

        let execution = agent.execute("q").await.unwrap();

        assert_eq!(execution.final_result, "recovered");
        let step = &execution.intermediate_steps[0];
        assert_eq!(step.action.tool, "_Exception");
        assert_eq!(
            step.observation,
            "Invalid Format: Missing 'Action Input:' after 'Action:'"
        );
        assert!(client.prompts()[1].contains(
            "Action: EchoTool\nObservation: Invalid Format: Missing 'Action Input:' after 'Action:'\nThought:"
        ));
    }

    #[tokio::test]
    async fn test_iteration_limit_forces_stop() {
        let client = ScriptedLlmClient::new(vec![]);
        let mut agent = AgentBuilder::with_client(client.clone())
            .with_max_iterations(3)
            .build()
            .unwrap();

        let execution = agent.execute("loop forever").await.unwrap();

        assert!(!execution.success);
        assert_eq!(execution.final_result, FORCE_STOP_ANSWER);
        assert_eq!(execution.steps_executed, 3);
        assert_eq!(client.prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_time_budget_stops_immediately() {
        let client = ScriptedLlmClient::new(vec!["Final Answer: never asked"]);
        let mut agent = AgentBuilder::with_client(client.clone())
            .with_agent_config(AgentConfig {
                max_execution_time_secs: Some(0),
                ..Default::default()
            })
            .build()
            .unwrap();

        let answer = agent.run("q").await.unwrap();

        assert_eq!(answer, FORCE_STOP_ANSWER);
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let client = ScriptedLlmClient::failing(LlmError::RateLimit {
            message: "slow down".to_string(),
        });
        let mut agent = agent(client);

        let err = agent.run("q").await.unwrap_err();
        assert!(matches!(err, Error::Llm(LlmError::RateLimit { .. })));
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let client = ScriptedLlmClient::new(vec![]);
        let mut agent = agent(client.clone());

        assert!(agent.run("   ").await.is_err());
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_events_follow_the_chain() {
        let client = ScriptedLlmClient::new(vec![
            "Action: EchoTool\nAction Input: hi",
            "Final Answer: bye",
        ]);
        let output = RecordingOutput::default();
        let mut agent = AgentBuilder::with_client(client)
            .with_output(Box::new(output.clone()))
            .build()
            .unwrap();

        agent.run("q").await.unwrap();

        let kinds: Vec<&str> = output
            .events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                AgentEvent::ExecutionStarted { .. } => Some("started"),
                AgentEvent::AgentAction { .. } => Some("action"),
                AgentEvent::ToolExecutionStarted { .. } => Some("tool_started"),
                AgentEvent::ToolExecutionCompleted { .. } => Some("tool_completed"),
                AgentEvent::Observation { .. } => Some("observation"),
                AgentEvent::AgentFinish { .. } => Some("finish"),
                AgentEvent::ExecutionCompleted { .. } => Some("completed"),
                _ => None,
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                "started",
                "action",
                "tool_started",
                "tool_completed",
                "observation",
                "finish",
                "completed"
            ]
        );
    }

    #[test]
    fn test_truncate_at_observation() {
        assert_eq!(
            truncate_at_observation("Action: EchoTool\nAction Input: a\nObservation: made up"),
            "Action: EchoTool\nAction Input: a"
        );
        assert_eq!(truncate_at_observation("Final Answer: x"), "Final Answer: x");
    }
}
