//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with the outside world:
//! - `artifact`: JSON model artifacts loaded from local storage
//! - `remote`: HTTPS fetch of the exercise classifier artifact
//! - `sanitize`: PII filtering for logs

pub mod artifact;
pub mod remote;
pub mod sanitize;

// Re-export artifact error for lib.rs
pub use artifact::ArtifactError;
