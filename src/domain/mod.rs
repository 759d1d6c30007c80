//! Domain layer: Core business types.

mod profile;
mod recommendation;
mod taxonomy;

pub use profile::{
    CategoricalField, NumericField, NumericKey, PatientProfile, AGE_GATE_MESSAGE,
    CATEGORICAL_FIELDS, NUMERIC_FIELDS, NUMERIC_KEYS, SYMPTOM_CHOICES,
};
pub use recommendation::{OutcomeEstimate, Recommendation, RecommendationReport};
pub use taxonomy::{group_for, ExerciseGroup, GroupLookup};
