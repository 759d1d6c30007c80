//! Model ports: capability traits for the pre-fit model artifacts.
//!
//! The models are opaque: the application only relies on these narrow
//! capabilities, each implementable by a mock for testing without a real
//! statistical model. Artifacts are loaded once at warm-up and treated as
//! read-only afterwards, so every trait is `Send + Sync`.

/// Errors raised by model capabilities during inference.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("Feature row has {got} columns, model expects {expected}")]
    ShapeMismatch { got: usize, expected: usize },

    #[error("Encoded label {0} is outside the decoder vocabulary")]
    UnknownLabel(u32),
}

/// A fit classifier exposing class probabilities.
pub trait ProbabilityClassifier: Send + Sync {
    /// Class probabilities for one feature row, aligned index-for-index
    /// with [`classes`](Self::classes).
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if the row width differs from the
    /// width the model was fit against.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Ordered encoded class identifiers, fixed at fit time.
    fn classes(&self) -> &[u32];
}

/// A fit label encoder, used in reverse to decode class identifiers.
pub trait LabelDecoder: Send + Sync {
    /// Map encoded class identifiers back to readable labels.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownLabel` for identifiers outside the
    /// vocabulary.
    fn inverse_transform(&self, encoded: &[u32]) -> Result<Vec<String>, ModelError>;
}

/// A fit multi-label binarizer over the symptom vocabulary.
pub trait SymptomBinarizer: Send + Sync {
    /// Fixed-width 0/1 vector ordered by [`vocabulary`](Self::vocabulary).
    /// Tags outside the vocabulary are silently ignored.
    fn transform(&self, selected: &[String]) -> Vec<f64>;

    /// Ordered tag vocabulary the binarizer was fit against.
    fn vocabulary(&self) -> &[String];
}

/// A fit single-output regressor.
pub trait Regressor: Send + Sync {
    /// Predict one numeric value for a feature row.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if the row width differs from the
    /// width the model was fit against.
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;
}
