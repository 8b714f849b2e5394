use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskOutput {
    pub description: String,
    pub expected_output: String,
    pub agent: String,
    pub raw: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewOutput {
    pub id: Uuid,
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Output of the last task, which is the crew's overall answer.
    pub fn raw(&self) -> &str {
        self.tasks_output.last().map(|t| t.raw.as_str()).unwrap_or("")
    }

    pub fn task_raw(&self, index: usize) -> Option<&str> {
        self.tasks_output.get(index).map(|t| t.raw.as_str())
    }
}
