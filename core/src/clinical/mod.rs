pub mod intake;
pub mod plan;
pub mod roster;
pub mod service;

pub use intake::{IntakeError, PatientIntake};
pub use plan::CarePlan;
pub use roster::build_crew;
pub use service::DiagnosisService;
