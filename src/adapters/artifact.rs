//! JSON model artifacts: implementations of the model ports.
//!
//! Every model is consumed as an opaque pre-fit artifact exported to JSON.
//! Each load validates the artifact shape before use and every failure names
//! the artifact that caused it, since a bad artifact is fatal at warm-up.
//!
//! Artifact files in the model directory:
//! - `group_classifier.json`: softmax-linear classifier over knee-pain features
//! - `group_labels.json` / `exercise_labels.json`: ordered label vocabularies
//! - `symptom_vocabulary.json`: symptom binarizer vocabulary
//! - `onehot_columns.json`: frozen one-hot schema for the classifiers
//! - `pain_reduction_model.json` / `weeks_to_effect_model.json`: linear regressors
//! - `regressor_symptom_vocabulary.json`, `regressor_onehot_columns.json`,
//!   `regressor_feature_cols.json`: the regression models' own preprocessing
//!
//! The exercise classifier itself is not read from local storage; it is
//! fetched over HTTPS at warm-up (see [`crate::adapters::remote`]).

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ports::{LabelDecoder, ModelError, ProbabilityClassifier, Regressor, SymptomBinarizer};

pub const GROUP_MODEL: &str = "group_classifier.json";
pub const GROUP_LABELS: &str = "group_labels.json";
pub const EXERCISE_MODEL: &str = "exercise_classifier.json";
pub const EXERCISE_LABELS: &str = "exercise_labels.json";
pub const SYMPTOM_VOCABULARY: &str = "symptom_vocabulary.json";
pub const ONEHOT_COLUMNS: &str = "onehot_columns.json";
pub const REDUCTION_MODEL: &str = "pain_reduction_model.json";
pub const TIME_MODEL: &str = "weeks_to_effect_model.json";
pub const REG_SYMPTOM_VOCABULARY: &str = "regressor_symptom_vocabulary.json";
pub const REG_ONEHOT_COLUMNS: &str = "regressor_onehot_columns.json";
pub const REG_FEATURE_COLS: &str = "regressor_feature_cols.json";

/// Errors raised while loading model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact {name} not found at {path:?}")]
    NotFound { name: &'static str, path: PathBuf },

    #[error("Artifact {name} could not be read: {source}")]
    Read {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("Artifact {name} is malformed: {reason}")]
    Malformed { name: &'static str, reason: String },

    #[error("Remote artifact {name} could not be fetched from {url}: {reason}")]
    Fetch {
        name: &'static str,
        url: String,
        reason: String,
    },
}

/// A fit multinomial logistic classifier exported to JSON.
///
/// `predict_proba` computes `softmax(W x + b)` over the ordered `classes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxClassifier {
    /// Ordered encoded class identifiers.
    pub classes: Vec<u32>,

    /// Coefficient matrix, one row per class.
    pub coefficients: Vec<Vec<f64>>,

    /// Intercept per class.
    pub intercepts: Vec<f64>,
}

impl SoftmaxClassifier {
    /// Parse and validate a classifier artifact from JSON text.
    ///
    /// # Errors
    /// Returns `ArtifactError::Malformed` naming the artifact on parse or
    /// shape problems.
    pub fn from_json_str(name: &'static str, json: &str) -> Result<Self, ArtifactError> {
        let model: Self = serde_json::from_str(json).map_err(|e| ArtifactError::Malformed {
            name,
            reason: e.to_string(),
        })?;
        model.validate(name)?;
        Ok(model)
    }

    fn validate(&self, name: &'static str) -> Result<(), ArtifactError> {
        let malformed = |reason: String| ArtifactError::Malformed { name, reason };

        let k = self.classes.len();
        if k == 0 {
            return Err(malformed("classifier has no classes".into()));
        }
        if self.coefficients.len() != k || self.intercepts.len() != k {
            return Err(malformed(format!(
                "expected {} coefficient rows and intercepts, got {} and {}",
                k,
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        let width = self.coefficients[0].len();
        if width == 0 {
            return Err(malformed("classifier has zero feature columns".into()));
        }
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err(malformed("coefficient rows have inconsistent widths".into()));
        }
        Ok(())
    }

    /// Feature-row width the classifier was fit against.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }
}

impl ProbabilityClassifier for SoftmaxClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ModelError::ShapeMismatch {
                got: features.len(),
                expected,
            });
        }

        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(self.intercepts.iter())
            .map(|(row, intercept)| {
                row.iter()
                    .zip(features.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + intercept
            })
            .collect();

        // Max-shifted softmax for numerical stability.
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        Ok(exps.into_iter().map(|e| e / total).collect())
    }

    fn classes(&self) -> &[u32] {
        &self.classes
    }
}

/// Ordered label vocabulary exported by a fit label encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelVocabulary {
    pub labels: Vec<String>,
}

impl LabelDecoder for LabelVocabulary {
    fn inverse_transform(&self, encoded: &[u32]) -> Result<Vec<String>, ModelError> {
        encoded
            .iter()
            .map(|&id| {
                self.labels
                    .get(id as usize)
                    .cloned()
                    .ok_or(ModelError::UnknownLabel(id))
            })
            .collect()
    }
}

/// Ordered symptom vocabulary exported by a fit multi-label binarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomVocabulary {
    pub classes: Vec<String>,
}

impl SymptomBinarizer for SymptomVocabulary {
    fn transform(&self, selected: &[String]) -> Vec<f64> {
        self.classes
            .iter()
            .map(|tag| {
                if selected.iter().any(|s| s == tag) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn vocabulary(&self) -> &[String] {
        &self.classes
    }
}

/// A fit linear regressor exported to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                got: features.len(),
                expected: self.coefficients.len(),
            });
        }
        Ok(self
            .coefficients
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept)
    }
}

/// The locally stored classification artifact set.
#[derive(Debug, Clone)]
pub struct ClassifierArtifacts {
    pub group_model: SoftmaxClassifier,
    pub group_labels: LabelVocabulary,
    pub exercise_labels: LabelVocabulary,
    pub symptoms: SymptomVocabulary,
    pub onehot_columns: Vec<String>,
}

/// The locally stored regression artifact set, including its own
/// preprocessing (the regressors were fit on a different column set).
#[derive(Debug, Clone)]
pub struct RegressionArtifacts {
    pub reduction_model: LinearRegressor,
    pub time_model: LinearRegressor,
    pub symptoms: SymptomVocabulary,
    pub onehot_columns: Vec<String>,
    pub numeric_fields: Vec<String>,
}

fn read_json<T: DeserializeOwned>(name: &'static str, dir: &Path) -> Result<T, ArtifactError> {
    let path = dir.join(name);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound { name, path }
        } else {
            ArtifactError::Read { name, source: e }
        }
    })?;
    serde_json::from_str(&content).map_err(|e| ArtifactError::Malformed {
        name,
        reason: e.to_string(),
    })
}

fn non_empty(name: &'static str, what: &str, len: usize) -> Result<(), ArtifactError> {
    if len == 0 {
        return Err(ArtifactError::Malformed {
            name,
            reason: format!("{what} is empty"),
        });
    }
    Ok(())
}

/// Load the classification artifact set from `dir`.
///
/// # Errors
/// Returns an error naming the first artifact that is missing, unreadable,
/// or malformed.
pub fn load_classifier_artifacts(dir: &Path) -> Result<ClassifierArtifacts, ArtifactError> {
    let group_model: SoftmaxClassifier = read_json(GROUP_MODEL, dir)?;
    group_model.validate(GROUP_MODEL)?;

    let group_labels: LabelVocabulary = read_json(GROUP_LABELS, dir)?;
    non_empty(GROUP_LABELS, "label vocabulary", group_labels.labels.len())?;

    let exercise_labels: LabelVocabulary = read_json(EXERCISE_LABELS, dir)?;
    non_empty(EXERCISE_LABELS, "label vocabulary", exercise_labels.labels.len())?;

    let symptoms: SymptomVocabulary = read_json(SYMPTOM_VOCABULARY, dir)?;
    non_empty(SYMPTOM_VOCABULARY, "symptom vocabulary", symptoms.classes.len())?;

    let onehot_columns: Vec<String> = read_json(ONEHOT_COLUMNS, dir)?;
    non_empty(ONEHOT_COLUMNS, "column schema", onehot_columns.len())?;

    tracing::info!(
        "Loaded classifier artifacts from {:?} ({} groups, {} exercises, {} one-hot columns)",
        dir,
        group_labels.labels.len(),
        exercise_labels.labels.len(),
        onehot_columns.len()
    );

    Ok(ClassifierArtifacts {
        group_model,
        group_labels,
        exercise_labels,
        symptoms,
        onehot_columns,
    })
}

/// Load the regression artifact set from `dir`, if configured.
///
/// Outcome estimation is an optional capability: when none of the regression
/// artifacts exist the pipeline runs without the stage and `Ok(None)` is
/// returned. A partially present set is treated as a broken deployment.
///
/// # Errors
/// Returns an error naming the failing artifact when the set is incomplete
/// or any member is unreadable or malformed.
pub fn load_regression_artifacts(dir: &Path) -> Result<Option<RegressionArtifacts>, ArtifactError> {
    const FILES: [&str; 5] = [
        REDUCTION_MODEL,
        TIME_MODEL,
        REG_SYMPTOM_VOCABULARY,
        REG_ONEHOT_COLUMNS,
        REG_FEATURE_COLS,
    ];

    let present = FILES.iter().filter(|f| dir.join(f).exists()).count();
    if present == 0 {
        tracing::info!("No regression artifacts in {:?}; outcome estimation disabled", dir);
        return Ok(None);
    }

    let reduction_model: LinearRegressor = read_json(REDUCTION_MODEL, dir)?;
    non_empty(REDUCTION_MODEL, "coefficient vector", reduction_model.coefficients.len())?;

    let time_model: LinearRegressor = read_json(TIME_MODEL, dir)?;
    non_empty(TIME_MODEL, "coefficient vector", time_model.coefficients.len())?;

    let symptoms: SymptomVocabulary = read_json(REG_SYMPTOM_VOCABULARY, dir)?;
    non_empty(REG_SYMPTOM_VOCABULARY, "symptom vocabulary", symptoms.classes.len())?;

    let onehot_columns: Vec<String> = read_json(REG_ONEHOT_COLUMNS, dir)?;
    non_empty(REG_ONEHOT_COLUMNS, "column schema", onehot_columns.len())?;

    let numeric_fields: Vec<String> = read_json(REG_FEATURE_COLS, dir)?;
    non_empty(REG_FEATURE_COLS, "numeric column list", numeric_fields.len())?;

    tracing::info!(
        "Loaded regression artifacts from {:?} ({} numeric + {} symptom + {} one-hot columns)",
        dir,
        numeric_fields.len(),
        symptoms.classes.len(),
        onehot_columns.len()
    );

    Ok(Some(RegressionArtifacts {
        reduction_model,
        time_model,
        symptoms,
        onehot_columns,
        numeric_fields,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_json(dir: &Path, name: &str, json: &str) {
        std::fs::write(dir.join(name), json).expect("write artifact");
    }

    fn two_class_model() -> SoftmaxClassifier {
        SoftmaxClassifier {
            classes: vec![0, 1],
            coefficients: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            intercepts: vec![0.0, 0.0],
        }
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let model = two_class_model();
        let probs = model.predict_proba(&[0.5, -0.5]).expect("predict");
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_predict_proba_shape_mismatch() {
        let model = two_class_model();
        let err = model.predict_proba(&[1.0]).expect_err("must fail");
        assert!(matches!(
            err,
            ModelError::ShapeMismatch { got: 1, expected: 2 }
        ));
    }

    #[test]
    fn test_classifier_validation_rejects_ragged_rows() {
        let json = r#"{"classes":[0,1],"coefficients":[[1.0,2.0],[1.0]],"intercepts":[0.0,0.0]}"#;
        let err = SoftmaxClassifier::from_json_str(GROUP_MODEL, json).expect_err("must fail");
        assert!(err.to_string().contains(GROUP_MODEL));
        assert!(err.to_string().contains("inconsistent"));
    }

    #[test]
    fn test_classifier_validation_rejects_row_count_mismatch() {
        let json = r#"{"classes":[0,1,2],"coefficients":[[1.0],[2.0]],"intercepts":[0.0,0.0]}"#;
        assert!(SoftmaxClassifier::from_json_str(GROUP_MODEL, json).is_err());
    }

    #[test]
    fn test_label_vocabulary_decoding() {
        let vocab = LabelVocabulary {
            labels: vec!["Walking".to_string(), "Squat".to_string()],
        };
        let decoded = vocab.inverse_transform(&[1, 0]).expect("decode");
        assert_eq!(decoded, vec!["Squat".to_string(), "Walking".to_string()]);

        let err = vocab.inverse_transform(&[5]).expect_err("must fail");
        assert!(matches!(err, ModelError::UnknownLabel(5)));
    }

    #[test]
    fn test_symptom_binarizer_ignores_unknown_tags() {
        let vocab = SymptomVocabulary {
            classes: vec!["Swelling".to_string(), "Stiffness".to_string()],
        };
        let row = vocab.transform(&["Stiffness".to_string(), "Glowing kneecap".to_string()]);
        assert_eq!(row, vec![0.0, 1.0]);

        let empty = vocab.transform(&[]);
        assert_eq!(empty, vec![0.0, 0.0]);
    }

    #[test]
    fn test_linear_regressor_prediction() {
        let model = LinearRegressor {
            coefficients: vec![2.0, -1.0],
            intercept: 0.5,
        };
        let value = model.predict(&[3.0, 4.0]).expect("predict");
        assert!((value - 2.5).abs() < f64::EPSILON);

        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_load_classifier_artifacts() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();

        write_json(
            dir,
            GROUP_MODEL,
            r#"{"classes":[0,1],"coefficients":[[0.1,0.2],[0.3,0.4]],"intercepts":[0.0,0.1]}"#,
        );
        write_json(dir, GROUP_LABELS, r#"{"labels":["Strength","Walking"]}"#);
        write_json(dir, EXERCISE_LABELS, r#"{"labels":["Squat","Walking"]}"#);
        write_json(dir, SYMPTOM_VOCABULARY, r#"{"classes":["Swelling"]}"#);
        write_json(dir, ONEHOT_COLUMNS, r#"["gender_Male"]"#);

        let artifacts = load_classifier_artifacts(dir).expect("load");
        assert_eq!(artifacts.group_model.classes, vec![0, 1]);
        assert_eq!(artifacts.onehot_columns, vec!["gender_Male".to_string()]);
    }

    #[test]
    fn test_missing_artifact_error_names_it() {
        let temp = tempdir().expect("tempdir");
        let err = load_classifier_artifacts(temp.path()).expect_err("must fail");
        assert!(err.to_string().contains(GROUP_MODEL));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_corrupt_artifact_error_names_it() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        write_json(dir, GROUP_MODEL, "{ not json");

        let err = load_classifier_artifacts(dir).expect_err("must fail");
        assert!(err.to_string().contains(GROUP_MODEL));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_absent_regression_set_is_disabled_not_an_error() {
        let temp = tempdir().expect("tempdir");
        assert!(load_regression_artifacts(temp.path())
            .expect("load")
            .is_none());
    }

    #[test]
    fn test_partial_regression_set_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();
        write_json(dir, REDUCTION_MODEL, r#"{"coefficients":[1.0],"intercept":0.0}"#);

        let err = load_regression_artifacts(dir).expect_err("must fail");
        assert!(err.to_string().contains(TIME_MODEL));
    }
}
