//! Patient profile types for knee-pain exercise recommendation.
//!
//! The intake questionnaire is a data table, not code: one set of field
//! definitions drives the form, the one-hot column naming convention
//! (`"{field}_{value}"`), and validation.

use serde::{Deserialize, Serialize};

/// Definition of a bounded numeric intake field.
#[derive(Debug, Clone, Copy)]
pub struct NumericField {
    pub key: NumericKey,
    pub label: &'static str,
    pub hint: &'static str,
    pub min: f64,
    pub max: f64,
}

/// Definition of a single-select categorical intake field.
#[derive(Debug, Clone, Copy)]
pub struct CategoricalField {
    /// Stable key used for one-hot column names.
    pub key: &'static str,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
}

/// Identifier for one of the four numeric features.
///
/// Regression artifacts carry their numeric column order by name; parsing the
/// names into this enum up front keeps the encoder free of string lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKey {
    PainLevel,
    Age,
    HeightIn,
    WeightLb,
}

impl NumericKey {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "pain_level" => Some(Self::PainLevel),
            "age" => Some(Self::Age),
            "height_in" => Some(Self::HeightIn),
            "weight_lb" => Some(Self::WeightLb),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PainLevel => "pain_level",
            Self::Age => "age",
            Self::HeightIn => "height_in",
            Self::WeightLb => "weight_lb",
        }
    }
}

/// Numeric feature order used by the classification models.
pub const NUMERIC_KEYS: [NumericKey; 4] = [
    NumericKey::PainLevel,
    NumericKey::Age,
    NumericKey::HeightIn,
    NumericKey::WeightLb,
];

/// Numeric intake fields with their bounds.
pub const NUMERIC_FIELDS: [NumericField; 4] = [
    NumericField {
        key: NumericKey::PainLevel,
        label: "Pain Level",
        hint: "1-10",
        min: 1.0,
        max: 10.0,
    },
    NumericField {
        key: NumericKey::Age,
        label: "Age",
        hint: "years (1-120)",
        min: 1.0,
        max: 120.0,
    },
    NumericField {
        key: NumericKey::HeightIn,
        label: "Height",
        hint: "inches (36-96)",
        min: 36.0,
        max: 96.0,
    },
    NumericField {
        key: NumericKey::WeightLb,
        label: "Weight",
        hint: "lbs (30-400)",
        min: 30.0,
        max: 400.0,
    },
];

/// The seven single-select questions with their option sets.
pub const CATEGORICAL_FIELDS: [CategoricalField; 7] = [
    CategoricalField {
        key: "comorbidity",
        prompt: "Do you experience any of these?",
        options: &[
            "Abnormal sleep pattern",
            "Pain at other joints",
            "None of the above",
        ],
    },
    CategoricalField {
        key: "cause",
        prompt: "What caused your knee pain?",
        options: &[
            "Overweight or obesity",
            "Injury or trauma",
            "Medical condition",
            "Aging",
            "Repeated stress or overuse",
            "Other conditions",
            "None of the above",
            "Don't know",
        ],
    },
    CategoricalField {
        key: "location",
        prompt: "Where do you feel your knee pain?",
        options: &[
            "Front of the knee",
            "All over the knee",
            "Surface above or behind the knee",
            "Deep inside the knee",
            "Multiple parts of the knee or leg",
            "None of the above",
        ],
    },
    CategoricalField {
        key: "timing",
        prompt: "When do you feel pain?",
        options: &[
            "When moving or bending the knee",
            "First thing in the morning",
            "At night after activity",
            "During bad weather",
            "When stressed or tired",
            "When unwell",
            "None of the above",
        ],
    },
    CategoricalField {
        key: "hispanic_origin",
        prompt: "Spanish, Hispanic, or Latino origin?",
        options: &["Yes", "No"],
    },
    CategoricalField {
        key: "race",
        prompt: "Race",
        options: &[
            "American Indian or Alaska Native",
            "Asian",
            "Black or African American",
            "Native Hawaiian or Other Pacific Islander",
            "White",
            "Other/Unknown",
            "Prefer not to say",
        ],
    },
    CategoricalField {
        key: "gender",
        prompt: "Gender",
        options: &[
            "Male",
            "Female",
            "Non-binary/third gender",
            "Other/Prefer not to say",
        ],
    },
];

/// Symptom tags offered by the intake form.
pub const SYMPTOM_CHOICES: [&str; 15] = [
    "Dull pain",
    "Throbbing pain",
    "Sharp pain",
    "Swelling",
    "Stiffness",
    "Redness and warmth",
    "Instability or weakness",
    "Popping or crunching noises",
    "Limited range of motion",
    "Locking of the knee joint",
    "Inability to bear weight",
    "Fever",
    "Disabling pain",
    "Others",
    "None",
];

/// Message shown when the age gate rejects a request.
pub const AGE_GATE_MESSAGE: &str =
    "This exercise recommendation tool is for patients above age 50 only.";

/// Patient-reported knee-pain attributes collected by the intake form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Current pain level (1-10)
    pub pain_level: u8,

    /// Age in years (1-120)
    pub age: u8,

    /// Height in inches (36-96)
    pub height_in: u16,

    /// Weight in pounds (30-400)
    pub weight_lb: u16,

    /// Selected answers, aligned index-for-index with `CATEGORICAL_FIELDS`.
    pub answers: Vec<String>,

    /// Selected symptom tags (zero or more).
    pub symptoms: Vec<String>,
}

impl PatientProfile {
    /// Numeric feature value for a given key.
    #[must_use]
    pub fn numeric_value(&self, key: NumericKey) -> f64 {
        match key {
            NumericKey::PainLevel => f64::from(self.pain_level),
            NumericKey::Age => f64::from(self.age),
            NumericKey::HeightIn => f64::from(self.height_in),
            NumericKey::WeightLb => f64::from(self.weight_lb),
        }
    }

    /// Answer for a categorical field by key.
    #[must_use]
    pub fn answer(&self, field_key: &str) -> Option<&str> {
        CATEGORICAL_FIELDS
            .iter()
            .position(|f| f.key == field_key)
            .and_then(|i| self.answers.get(i))
            .map(String::as_str)
    }

    /// Validate numeric ranges and categorical option membership.
    ///
    /// Unknown symptom tags are deliberately not an error; they are ignored
    /// at encoding time because symptom vocabularies may drift from the
    /// training-time artifact.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for field in &NUMERIC_FIELDS {
            let value = self.numeric_value(field.key);
            if value < field.min || value > field.max {
                errors.push(format!(
                    "{} {} out of range [{}, {}]",
                    field.label, value, field.min, field.max
                ));
            }
        }

        if self.answers.len() != CATEGORICAL_FIELDS.len() {
            errors.push(format!(
                "Expected {} answers, got {}",
                CATEGORICAL_FIELDS.len(),
                self.answers.len()
            ));
        } else {
            for (field, answer) in CATEGORICAL_FIELDS.iter().zip(self.answers.iter()) {
                if !field.options.contains(&answer.as_str()) {
                    errors.push(format!("{}: \"{}\" is not a valid option", field.prompt, answer));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Check the age gate: recommendations are only produced for patients
    /// above age 50.
    ///
    /// # Errors
    /// Returns the user-visible gate message when the patient is too young.
    pub fn eligibility(&self) -> Result<(), String> {
        if self.age <= 50 {
            Err(AGE_GATE_MESSAGE.to_string())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> PatientProfile {
        PatientProfile {
            pain_level: 5,
            age: 55,
            height_in: 66,
            weight_lb: 150,
            answers: CATEGORICAL_FIELDS
                .iter()
                .map(|f| f.options[0].to_string())
                .collect(),
            symptoms: vec!["Dull pain".to_string(), "Stiffness".to_string()],
        }
    }

    #[test]
    fn test_valid_profile() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_numeric_out_of_range() {
        let mut profile = sample_profile();
        profile.pain_level = 11;
        profile.weight_lb = 20;
        let errors = profile.validate().expect_err("should fail");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("Pain Level"));
        assert!(errors[1].contains("Weight"));
    }

    #[test]
    fn test_unknown_categorical_option() {
        let mut profile = sample_profile();
        profile.answers[1] = "Meteor strike".to_string();
        let errors = profile.validate().expect_err("should fail");
        assert!(errors[0].contains("not a valid option"));
    }

    #[test]
    fn test_wrong_answer_count() {
        let mut profile = sample_profile();
        profile.answers.pop();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_unknown_symptoms_are_not_validation_errors() {
        let mut profile = sample_profile();
        profile.symptoms.push("Glowing kneecap".to_string());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_age_gate() {
        let mut profile = sample_profile();
        profile.age = 50;
        assert_eq!(profile.eligibility().expect_err("gated"), AGE_GATE_MESSAGE);

        profile.age = 51;
        assert!(profile.eligibility().is_ok());
    }

    #[test]
    fn test_numeric_key_roundtrip() {
        for key in NUMERIC_KEYS {
            assert_eq!(NumericKey::parse(key.name()), Some(key));
        }
        assert_eq!(NumericKey::parse("shoe_size"), None);
    }

    #[test]
    fn test_answer_by_key() {
        let profile = sample_profile();
        assert_eq!(profile.answer("gender"), Some("Male"));
        assert_eq!(profile.answer("not_a_field"), None);
    }
}
