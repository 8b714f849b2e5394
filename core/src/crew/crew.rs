use crate::agent::Agent;
use crate::crew::{CrewOutput, Task, TaskOutput};
use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// Runs its tasks one after another. Each task sees the raw outputs of every
/// task completed before it.
#[derive(Debug, Clone)]
pub struct Crew {
    pub agents: Vec<Arc<Agent>>,
    pub tasks: Vec<Task>,
    pub verbose: bool,
}

impl Crew {
    pub fn new(agents: Vec<Arc<Agent>>, tasks: Vec<Task>) -> Self {
        Self {
            agents,
            tasks,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub async fn kickoff(&self) -> Result<CrewOutput> {
        if self.tasks.is_empty() {
            bail!("Crew has no tasks to run");
        }

        let id = Uuid::new_v4();
        let started = Instant::now();
        if self.verbose {
            info!(crew = %id, agents = self.agents.len(), tasks = self.tasks.len(), "Crew kickoff");
        }

        let mut tasks_output: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for (index, task) in self.tasks.iter().enumerate() {
            if self.verbose {
                info!(crew = %id, task = index + 1, agent = %task.agent.role, "Task started");
            }

            let context = aggregate_context(&tasks_output);
            let output = task.execute(context.as_deref()).await?;

            if self.verbose {
                info!(
                    crew = %id,
                    task = index + 1,
                    agent = %task.agent.role,
                    chars = output.raw.chars().count(),
                    "Task completed"
                );
            }
            tasks_output.push(output);
        }

        if self.verbose {
            info!(crew = %id, elapsed_ms = started.elapsed().as_millis() as u64, "Crew finished");
        }

        Ok(CrewOutput { id, tasks_output })
    }
}

fn aggregate_context(outputs: &[TaskOutput]) -> Option<String> {
    if outputs.is_empty() {
        return None;
    }
    Some(
        outputs
            .iter()
            .map(|o| o.raw.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR),
    )
}
