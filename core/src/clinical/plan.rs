use crate::crew::CrewOutput;
use serde::{Deserialize, Serialize};

pub const NO_DIAGNOSIS: &str = "No diagnosis available.";
pub const NO_TREATMENT: &str = "No treatment available.";
pub const NO_TESTS: &str = "No test recommendations available.";

/// The three crew answers, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlan {
    pub diagnosis: String,
    pub treatment: String,
    pub tests: String,
}

impl CarePlan {
    pub fn from_crew_output(output: &CrewOutput) -> Self {
        let pick = |index: usize, fallback: &str| {
            output
                .task_raw(index)
                .filter(|raw| !raw.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            diagnosis: pick(0, NO_DIAGNOSIS),
            treatment: pick(1, NO_TREATMENT),
            tests: pick(2, NO_TESTS),
        }
    }

    /// Section titles paired with their text.
    pub fn sections(&self) -> [(&'static str, &str); 3] {
        [
            ("Diagnosis", self.diagnosis.as_str()),
            ("Treatment Plan", self.treatment.as_str()),
            ("Recommended Tests", self.tests.as_str()),
        ]
    }

    pub fn to_markdown(&self) -> String {
        self.sections()
            .iter()
            .map(|(title, body)| format!("## {}:\n{}", title, body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
