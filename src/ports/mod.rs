//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the pre-fit statistical model artifacts.

mod model;

pub use model::{LabelDecoder, ModelError, ProbabilityClassifier, Regressor, SymptomBinarizer};
