use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Please enter both symptoms and medical history.")]
    MissingFields,
}

/// Patient-reported symptoms and history, both required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIntake {
    symptoms: String,
    medical_history: String,
}

impl PatientIntake {
    pub fn new(
        symptoms: impl AsRef<str>,
        medical_history: impl AsRef<str>,
    ) -> Result<Self, IntakeError> {
        let symptoms = symptoms.as_ref().trim();
        let medical_history = medical_history.as_ref().trim();

        if symptoms.is_empty() || medical_history.is_empty() {
            return Err(IntakeError::MissingFields);
        }

        Ok(Self {
            symptoms: symptoms.to_string(),
            medical_history: medical_history.to_string(),
        })
    }

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn medical_history(&self) -> &str {
        &self.medical_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_both_fields() {
        let intake = PatientIntake::new("  headache\n", "\tnone ").unwrap();
        assert_eq!(intake.symptoms(), "headache");
        assert_eq!(intake.medical_history(), "none");
    }

    #[test]
    fn requires_both_fields() {
        assert_eq!(
            PatientIntake::new("fever", "   "),
            Err(IntakeError::MissingFields)
        );
        assert_eq!(PatientIntake::new("", "asthma"), Err(IntakeError::MissingFields));
        assert_eq!(
            IntakeError::MissingFields.to_string(),
            "Please enter both symptoms and medical history."
        );
    }
}
