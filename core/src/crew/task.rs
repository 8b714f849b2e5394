use crate::agent::{Agent, TaskPrompt};
use crate::crew::TaskOutput;
use anyhow::{Context, Result};
use std::sync::Arc;

/// A unit of work assigned to one agent.
#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<Agent>,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }

    pub async fn execute(&self, context: Option<&str>) -> Result<TaskOutput> {
        let prompt = TaskPrompt {
            description: &self.description,
            expected_output: &self.expected_output,
            context,
        };

        let raw = self
            .agent
            .execute_task(&prompt)
            .await
            .with_context(|| format!("Task for '{}' failed", self.agent.role))?;

        Ok(TaskOutput {
            description: self.description.clone(),
            expected_output: self.expected_output.clone(),
            agent: self.agent.role.clone(),
            raw,
        })
    }
}
