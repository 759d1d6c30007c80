//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the recommendation pipeline.

mod encoder;
mod recommend;

pub use encoder::FeatureEncoder;
pub use recommend::{
    adjusted_confidence, ClassifierAdapter, OutcomeStage, RecommendationService,
};
