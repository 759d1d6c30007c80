//! Feature encoder: raw form answers to a fixed-width numeric row.
//!
//! The models were fit against a frozen schema (ordered column names). The
//! encoder reproduces that schema deterministically for any profile: numeric
//! block in fixed order, then one 0/1 column per symptom vocabulary entry,
//! then the one-hot categorical block reconciled against the frozen column
//! list. Reconciliation is what guarantees a fixed width regardless of which
//! options the user picked: a schema column the profile does not activate is
//! 0.0, and a generated column the schema does not know is dropped.
//!
//! Each request runs this twice, with the classification schema and the
//! regression schema, because the two model families were fit on different
//! column sets.

use std::collections::HashSet;

use crate::domain::{NumericKey, PatientProfile, CATEGORICAL_FIELDS};
use crate::ports::SymptomBinarizer;

pub struct FeatureEncoder {
    numeric: Vec<NumericKey>,
    binarizer: Box<dyn SymptomBinarizer>,
    onehot_columns: Vec<String>,
}

impl FeatureEncoder {
    /// Create an encoder for one frozen schema.
    #[must_use]
    pub fn new(
        numeric: Vec<NumericKey>,
        binarizer: Box<dyn SymptomBinarizer>,
        onehot_columns: Vec<String>,
    ) -> Self {
        Self {
            numeric,
            binarizer,
            onehot_columns,
        }
    }

    /// Total row width: numeric + symptom + one-hot columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.numeric.len() + self.binarizer.vocabulary().len() + self.onehot_columns.len()
    }

    /// Encode a profile into the schema's ordered feature row.
    #[must_use]
    pub fn encode(&self, profile: &PatientProfile) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());

        for &key in &self.numeric {
            row.push(profile.numeric_value(key));
        }

        row.extend(self.binarizer.transform(&profile.symptoms));

        // One-hot columns the profile activates, by the "{field}_{value}" convention.
        let active: HashSet<String> = CATEGORICAL_FIELDS
            .iter()
            .filter_map(|field| {
                profile
                    .answer(field.key)
                    .map(|answer| format!("{}_{}", field.key, answer))
            })
            .collect();

        for column in &self.onehot_columns {
            row.push(if active.contains(column) { 1.0 } else { 0.0 });
        }

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifact::SymptomVocabulary;
    use crate::domain::{NUMERIC_KEYS, SYMPTOM_CHOICES};

    fn binarizer() -> Box<dyn SymptomBinarizer> {
        Box::new(SymptomVocabulary {
            classes: vec![
                "Dull pain".to_string(),
                "Swelling".to_string(),
                "Stiffness".to_string(),
            ],
        })
    }

    fn schema() -> Vec<String> {
        vec![
            "gender_Male".to_string(),
            "gender_Female".to_string(),
            "hispanic_origin_Yes".to_string(),
            "hispanic_origin_No".to_string(),
        ]
    }

    fn profile() -> PatientProfile {
        PatientProfile {
            pain_level: 5,
            age: 55,
            height_in: 66,
            weight_lb: 150,
            answers: CATEGORICAL_FIELDS
                .iter()
                .map(|f| f.options[0].to_string())
                .collect(),
            symptoms: vec!["Swelling".to_string()],
        }
    }

    #[test]
    fn test_row_matches_schema_width_and_order() {
        let encoder = FeatureEncoder::new(NUMERIC_KEYS.to_vec(), binarizer(), schema());
        let row = encoder.encode(&profile());

        assert_eq!(row.len(), encoder.width());
        assert_eq!(row.len(), 4 + 3 + 4);
        // Numeric block in fixed order.
        assert_eq!(&row[..4], &[5.0, 55.0, 66.0, 150.0]);
        // Symptom block ordered by vocabulary.
        assert_eq!(&row[4..7], &[0.0, 1.0, 0.0]);
        // One-hot block: the sample profile answers "Male" and "Yes".
        assert_eq!(&row[7..], &[1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zero_symptoms_give_all_zero_block() {
        let encoder = FeatureEncoder::new(NUMERIC_KEYS.to_vec(), binarizer(), schema());
        let mut p = profile();
        p.symptoms.clear();

        let row = encoder.encode(&p);
        assert_eq!(row.len(), encoder.width());
        assert_eq!(&row[4..7], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_all_symptoms_selected_keeps_width() {
        let encoder = FeatureEncoder::new(NUMERIC_KEYS.to_vec(), binarizer(), schema());
        let mut p = profile();
        p.symptoms = SYMPTOM_CHOICES.iter().map(|s| (*s).to_string()).collect();

        let row = encoder.encode(&p);
        assert_eq!(row.len(), encoder.width());
        // Only the three vocabulary symptoms flip on; the rest are ignored.
        assert_eq!(&row[4..7], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_schema_drift_encodes_all_zero_one_hot_block() {
        // Schema knows no gender columns at all: the profile's gender answer
        // generates a column the schema drops, and no column errors.
        let encoder = FeatureEncoder::new(
            NUMERIC_KEYS.to_vec(),
            binarizer(),
            vec![
                "gender_Retired option".to_string(),
                "hispanic_origin_Yes".to_string(),
            ],
        );
        let row = encoder.encode(&profile());

        assert_eq!(row.len(), encoder.width());
        assert_eq!(&row[7..], &[0.0, 1.0]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let encoder = FeatureEncoder::new(NUMERIC_KEYS.to_vec(), binarizer(), schema());
        let p = profile();
        assert_eq!(encoder.encode(&p), encoder.encode(&p));
    }

    #[test]
    fn test_regression_numeric_order_differs() {
        // The regression schema can carry its own numeric order.
        let encoder = FeatureEncoder::new(
            vec![NumericKey::Age, NumericKey::PainLevel],
            binarizer(),
            vec![],
        );
        let row = encoder.encode(&profile());
        assert_eq!(&row[..2], &[55.0, 5.0]);
    }
}
