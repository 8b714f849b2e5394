use crate::agent::{Agent, ToolRegistry};
use crate::clinical::PatientIntake;
use crate::crew::{Crew, Task};
use crate::traits::Provider;
use std::sync::Arc;

pub const DIAGNOSTICIAN_ROLE: &str = "Medical Diagnostician";
pub const TREATMENT_ADVISOR_ROLE: &str = "Treatment Advisor";
pub const TESTING_ADVISOR_ROLE: &str = "Medical Testing Advisor";

struct Persona {
    role: &'static str,
    goal: &'static str,
    backstory: &'static str,
}

const DIAGNOSTICIAN: Persona = Persona {
    role: DIAGNOSTICIAN_ROLE,
    goal: "Analyze patient symptoms and medical history to provide a preliminary diagnosis.",
    backstory: "Expert in diagnosing medical conditions based on patient-reported symptoms and history.",
};

const TREATMENT_ADVISOR: Persona = Persona {
    role: TREATMENT_ADVISOR_ROLE,
    goal: "Recommend appropriate treatment plans based on the diagnosis.",
    backstory: "Expert in developing patient-specific treatment strategies.",
};

const TESTING_ADVISOR: Persona = Persona {
    role: TESTING_ADVISOR_ROLE,
    goal: "Suggest necessary medical tests based on diagnosis and symptoms.",
    backstory: "Expert in recommending diagnostic tests such as MRI, blood tests, and CBP.",
};

fn diagnose_description(intake: &PatientIntake) -> String {
    format!(
        "1. Analyze the patient's symptoms ({}) and medical history ({}).\n\
         2. Provide a preliminary diagnosis with possible conditions.\n\
         3. Limit the diagnosis to the most likely conditions.",
        intake.symptoms(),
        intake.medical_history()
    )
}

fn treatment_description(intake: &PatientIntake) -> String {
    format!(
        "1. Based on the diagnosis, recommend step-by-step treatment plans.\n\
         2. Consider the patient's medical history ({}) and symptoms ({}).\n\
         3. Provide detailed treatment recommendations including medications and lifestyle changes.",
        intake.medical_history(),
        intake.symptoms()
    )
}

const TESTING_DESCRIPTION: &str = "1. Recommend necessary medical tests based on diagnosis and symptoms.\n\
     2. Suggest tests such as MRI, blood tests, and CBP where relevant.\n\
     3. Explain why each test is recommended and how it aids in diagnosis.";

/// Limits applied to every agent on the roster.
#[derive(Debug, Clone, Copy)]
pub struct RosterLimits {
    pub max_iterations: usize,
}

impl Default for RosterLimits {
    fn default() -> Self {
        Self { max_iterations: 15 }
    }
}

fn hire(
    persona: &Persona,
    llm: &Arc<dyn Provider>,
    tools: &Arc<ToolRegistry>,
    limits: RosterLimits,
) -> Arc<Agent> {
    Arc::new(
        Agent::new(persona.role, persona.goal, persona.backstory, llm.clone())
            .with_tools(tools.clone())
            .with_verbose(true)
            .with_max_iterations(limits.max_iterations),
    )
}

/// Assembles the diagnostician, treatment advisor and testing advisor with
/// their three tasks, in that order.
pub fn build_crew(
    intake: &PatientIntake,
    llm: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    limits: RosterLimits,
) -> Crew {
    let diagnostician = hire(&DIAGNOSTICIAN, &llm, &tools, limits);
    let treatment_advisor = hire(&TREATMENT_ADVISOR, &llm, &tools, limits);
    let testing_advisor = hire(&TESTING_ADVISOR, &llm, &tools, limits);

    let tasks = vec![
        Task::new(
            diagnose_description(intake),
            "A preliminary diagnosis with possible conditions.",
            diagnostician.clone(),
        ),
        Task::new(
            treatment_description(intake),
            "A comprehensive treatment plan.",
            treatment_advisor.clone(),
        ),
        Task::new(
            TESTING_DESCRIPTION,
            "A list of recommended tests with justifications.",
            testing_advisor.clone(),
        ),
    ];

    Crew::new(vec![diagnostician, treatment_advisor, testing_advisor], tasks).with_verbose(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;

    fn crew() -> Crew {
        let intake = PatientIntake::new("persistent cough", "smoker, 20 years").unwrap();
        build_crew(
            &intake,
            Arc::new(ScriptedProvider::new(vec![])),
            Arc::new(ToolRegistry::new()),
            RosterLimits { max_iterations: 4 },
        )
    }

    #[test]
    fn roster_has_three_agents_in_order() {
        let crew = crew();
        let roles: Vec<&str> = crew.agents.iter().map(|a| a.role.as_str()).collect();
        assert_eq!(
            roles,
            vec![DIAGNOSTICIAN_ROLE, TREATMENT_ADVISOR_ROLE, TESTING_ADVISOR_ROLE]
        );
        assert!(crew.agents.iter().all(|a| a.verbose && a.max_iterations == 4));
    }

    #[test]
    fn tasks_interpolate_the_intake() {
        let crew = crew();
        assert_eq!(crew.tasks.len(), 3);
        assert!(crew.tasks[0].description.contains(
            "Analyze the patient's symptoms (persistent cough) and medical history (smoker, 20 years)."
        ));
        assert!(crew.tasks[1].description.contains(
            "Consider the patient's medical history (smoker, 20 years) and symptoms (persistent cough)."
        ));
        assert!(!crew.tasks[2].description.contains("persistent cough"));
        assert_eq!(crew.tasks[2].agent.role, TESTING_ADVISOR_ROLE);
        assert_eq!(crew.tasks[1].expected_output, "A comprehensive treatment plan.");
    }
}
