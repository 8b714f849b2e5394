use crate::agent::{AgentExecutor, TaskPrompt, ToolRegistry};
use crate::traits::Provider;
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

const DEFAULT_MAX_ITERATIONS: usize = 15;

/// A role-configured LLM worker: who it is, what it wants, and which tools
/// it may call.
#[derive(Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub verbose: bool,
    pub max_iterations: usize,
    llm: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn Provider>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            verbose: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            llm,
            tools: Arc::new(ToolRegistry::new()),
        }
    }

    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn llm(&self) -> &Arc<dyn Provider> {
        &self.llm
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    pub async fn execute_task(&self, task: &TaskPrompt<'_>) -> Result<String> {
        AgentExecutor::new(self).execute(task).await
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("provider", &self.llm.name())
            .field("tools", &self.tools.names())
            .finish()
    }
}
