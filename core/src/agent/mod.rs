pub mod agent;
pub mod executor;
pub mod prompt;
pub mod registry;

pub use agent::Agent;
pub use executor::AgentExecutor;
pub use prompt::{TaskPrompt, build_system_prompt};
pub use registry::ToolRegistry;
