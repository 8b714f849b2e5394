pub mod crew;
pub mod output;
pub mod task;

pub use crew::Crew;
pub use output::{CrewOutput, TaskOutput};
pub use task::Task;
