//! # Flexion
//!
//! Knee-pain exercise recommendation pipeline.
//!
//! This crate provides:
//! - Deterministic feature encoding of patient-reported knee-pain attributes
//! - Ranked, grouped exercise recommendations from pre-fit classifiers
//! - Pain-reduction / weeks-to-effect estimates from pre-fit regressors
//! - Terminal UI for the intake form and results
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientProfile, taxonomy, recommendations)
//! - `ports`: Trait definitions for the model capabilities
//! - `adapters`: Concrete implementations (JSON artifacts, remote fetch, log filtering)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ExerciseGroup, PatientProfile, RecommendationReport};

/// Result type for Flexion operations
pub type Result<T> = std::result::Result<T, FlexionError>;

/// Main error type for Flexion
#[derive(Debug, thiserror::Error)]
pub enum FlexionError {
    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("Model artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Model inference failed: {0}")]
    Model(#[from] ports::ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
