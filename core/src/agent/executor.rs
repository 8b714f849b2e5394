use crate::agent::{Agent, TaskPrompt, build_system_prompt};
use crate::traits::{ChatMessage, ChatRequest, ToolCall};
use anyhow::{Result, bail};
use tracing::{debug, info, warn};

const TOOL_CALL_OPEN_TAG: &str = "<tool_call>";
const TOOL_CALL_CLOSE_TAG: &str = "</tool_call>";
const FINAL_ANSWER_NUDGE: &str = "Now it's time you MUST give your absolute best final answer. \
Stop using tools and return your complete final answer.";

/// Runs one task for one agent: a chat loop that executes tool calls until the
/// model produces a tool-free answer.
pub struct AgentExecutor<'a> {
    agent: &'a Agent,
}

impl<'a> AgentExecutor<'a> {
    pub fn new(agent: &'a Agent) -> Self {
        Self { agent }
    }

    pub async fn execute(&self, task: &TaskPrompt<'_>) -> Result<String> {
        let agent = self.agent;
        let tools = agent.tools().get_specs();
        let mut messages = vec![
            ChatMessage::system(build_system_prompt(agent, &tools)),
            ChatMessage::user(task.render()),
        ];

        for iteration in 1..=agent.max_iterations {
            let request = ChatRequest {
                messages: &messages,
                tools: if tools.is_empty() { None } else { Some(&tools) },
            };
            let response = agent.llm().chat(request).await?;

            let (text, tool_calls) = if response.has_tool_calls() {
                (response.text_or_empty().to_string(), response.tool_calls)
            } else if let Some(text) = &response.text {
                parse_tool_calls_fallback(text)
            } else {
                bail!("Agent '{}' returned an empty answer", agent.role);
            };

            if tool_calls.is_empty() {
                let answer = text.trim();
                if answer.is_empty() {
                    bail!("Agent '{}' returned an empty answer", agent.role);
                }
                if agent.verbose {
                    info!(agent = %agent.role, iteration, "Final answer ready");
                }
                return Ok(answer.to_string());
            }

            messages.push(ChatMessage::assistant_with_tool_calls(
                text,
                tool_calls.clone(),
            ));

            for call in tool_calls {
                if agent.verbose {
                    info!(agent = %agent.role, tool = %call.name, iteration, "Using tool");
                }
                let content = self.run_tool(&call).await;
                messages.push(ChatMessage::tool_result(call.id, content));
            }
        }

        warn!(
            agent = %agent.role,
            max_iterations = agent.max_iterations,
            "Iteration limit reached, requesting final answer"
        );
        self.force_final_answer(messages).await
    }

    async fn run_tool(&self, call: &ToolCall) -> String {
        let result = match serde_json::from_str::<serde_json::Value>(&call.arguments) {
            Ok(args) => self.agent.tools().execute(&call.name, args).await,
            Err(e) => crate::traits::ToolResult::error(format!(
                "Invalid arguments for {}: {}",
                call.name, e
            )),
        };

        if !result.success {
            debug!(
                tool = %call.name,
                error = result.error.as_deref().unwrap_or_default(),
                "Tool call failed"
            );
        }

        serde_json::to_string(&result).unwrap_or_default()
    }

    async fn force_final_answer(&self, mut messages: Vec<ChatMessage>) -> Result<String> {
        messages.push(ChatMessage::user(FINAL_ANSWER_NUDGE));
        let request = ChatRequest {
            messages: &messages,
            tools: None,
        };
        let response = self.agent.llm().chat(request).await?;
        let (text, _) = parse_tool_calls_fallback(response.text_or_empty());

        if text.trim().is_empty() {
            bail!(
                "Agent '{}' gave no final answer after {} iterations",
                self.agent.role,
                self.agent.max_iterations
            );
        }
        Ok(text.trim().to_string())
    }
}

/// Pulls `<tool_call>{...}</tool_call>` blocks out of plain text for models
/// without native tool calling. Returns the remaining text and the calls.
pub fn parse_tool_calls_fallback(response: &str) -> (String, Vec<ToolCall>) {
    let mut text_parts = Vec::new();
    let mut values = Vec::new();
    let mut remaining = response;

    while let Some(start) = remaining.find(TOOL_CALL_OPEN_TAG) {
        let after_open = &remaining[start + TOOL_CALL_OPEN_TAG.len()..];
        let Some(close_idx) = after_open.find(TOOL_CALL_CLOSE_TAG) else {
            break;
        };

        let before = remaining[..start].trim();
        if !before.is_empty() {
            text_parts.push(before.to_string());
        }

        values.extend(extract_json_values(&after_open[..close_idx]));
        remaining = &after_open[close_idx + TOOL_CALL_CLOSE_TAG.len()..];
    }

    if !remaining.trim().is_empty() {
        text_parts.push(remaining.trim().to_string());
    }

    let calls: Vec<ToolCall> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| parse_tool_call_value(index, value))
        .collect();

    (text_parts.join("\n"), calls)
}

fn extract_json_values(text: &str) -> Vec<serde_json::Value> {
    let mut values = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escape_next => escape_next = false,
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(s) = start.take()
                    && let Ok(value) = serde_json::from_str(&text[s..=i])
                {
                    values.push(value);
                }
            }
            _ => {}
        }
    }

    values
}

/// Ids hash the call's position in the turn, so repeated identical calls
/// still get distinct ids.
fn parse_tool_call_value(index: usize, value: &serde_json::Value) -> Option<ToolCall> {
    let name = value.get("name")?.as_str()?.to_string();
    let arguments = value
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));
    let arguments = serde_json::to_string(&arguments).ok()?;
    let id = format!(
        "call_{:x}",
        md5::compute(format!("{index}:{name}{arguments}").as_bytes())
    );

    Some(ToolCall {
        id,
        name,
        arguments,
    })
}
