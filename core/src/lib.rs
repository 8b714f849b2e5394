pub mod agent;
pub mod clinical;
pub mod config;
pub mod crew;
pub mod providers;
pub mod report;
pub mod tools;
pub mod traits;

#[cfg(test)]
mod testing;

pub use agent::{Agent, AgentExecutor, ToolRegistry};
pub use clinical::{CarePlan, DiagnosisService, IntakeError, PatientIntake};
pub use config::Config;
pub use crew::{Crew, CrewOutput, Task, TaskOutput};
pub use providers::create_provider;
pub use traits::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
