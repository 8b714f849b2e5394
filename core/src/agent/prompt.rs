use crate::agent::Agent;
use crate::traits::ToolSpec;
use std::fmt::Write;

/// Everything an agent needs to know about the task in front of it.
#[derive(Debug, Clone, Copy)]
pub struct TaskPrompt<'a> {
    pub description: &'a str,
    pub expected_output: &'a str,
    pub context: Option<&'a str>,
}

impl TaskPrompt<'_> {
    pub fn render(&self) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            self.description.trim(),
            self.expected_output.trim()
        );

        if let Some(context) = self.context.filter(|c| !c.trim().is_empty()) {
            let _ = write!(
                prompt,
                "\n\nThis is the context you're working with:\n{}",
                context.trim()
            );
        }

        prompt.push_str("\n\nBegin! This is VERY important to you, use the tools available and give your best Final Answer, your job depends on it!");
        prompt
    }
}

pub fn build_system_prompt(agent: &Agent, tool_specs: &[ToolSpec]) -> String {
    let mut parts = vec![format!(
        "You are {}. {}\nYour personal goal is: {}",
        agent.role, agent.backstory, agent.goal
    )];

    if !tool_specs.is_empty() {
        parts.push(tool_instructions(tool_specs));
    }

    parts.push(runtime_context());
    parts.join("\n\n---\n\n")
}

fn tool_instructions(tool_specs: &[ToolSpec]) -> String {
    let mut instructions = String::new();
    instructions.push_str("## Tools\n\n");
    instructions.push_str("You may call tools to gather information before answering. ");
    instructions.push_str("If native tool calling is unavailable, wrap a JSON object in <tool_call> tags:\n\n");
    instructions.push_str("<tool_call>\n{\"name\": \"tool_name\", \"arguments\": {\"param\": \"value\"}}\n</tool_call>\n\n");
    instructions.push_str("Tool results come back in the conversation. ");
    instructions.push_str("When you have enough information, answer without any tool call.\n\n");
    instructions.push_str("### Available Tools\n\n");

    for tool in tool_specs {
        let _ = writeln!(
            instructions,
            "**{}**: {}\nParameters: `{}`\n",
            tool.name, tool.description, tool.parameters_schema
        );
    }

    instructions
}

fn runtime_context() -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M (%A)");
    format!("## Runtime Context\n\nCurrent time: {}", timestamp)
}
