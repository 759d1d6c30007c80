//! Recommendation service: the request pipeline from profile to report.
//!
//! Orchestrates:
//! - Validation and the age gate (before any model work)
//! - Feature encoding against the classification and regression schemas
//! - Group and exercise classification
//! - Ranking and grouping
//! - Outcome estimation for the top exercise

use std::cmp::Ordering;

use crate::adapters::artifact::{
    self, ClassifierArtifacts, RegressionArtifacts, SoftmaxClassifier,
};
use crate::application::FeatureEncoder;
use crate::domain::{
    ExerciseGroup, GroupLookup, NumericKey, OutcomeEstimate, PatientProfile, Recommendation,
    RecommendationReport, NUMERIC_KEYS,
};
use crate::ports::{LabelDecoder, ModelError, ProbabilityClassifier, Regressor};
use crate::FlexionError;

/// Number of groups shown per request.
const TOP_GROUPS: usize = 3;

/// Number of exercises shown per group.
const TOP_EXERCISES_PER_GROUP: usize = 3;

/// Confidence rescaling factor. With three or more plausible groups the raw
/// probabilities run low; the displayed number is inflated by this factor and
/// clamped at 100.0. Changing it silently changes every displayed confidence.
const CONFIDENCE_SCALE: f64 = 2.5;

/// Rescale a raw group probability into the displayed confidence:
/// `min(round(p * 100 * 2.5, 1), 100.0)`.
#[must_use]
pub fn adjusted_confidence(probability: f64) -> f64 {
    let scaled = (probability * 100.0 * CONFIDENCE_SCALE * 10.0).round() / 10.0;
    scaled.min(100.0)
}

/// The two fit classifiers and their label decoders.
pub struct ClassifierAdapter {
    group_model: Box<dyn ProbabilityClassifier>,
    group_labels: Box<dyn LabelDecoder>,
    exercise_model: Box<dyn ProbabilityClassifier>,
    exercise_labels: Box<dyn LabelDecoder>,
}

impl ClassifierAdapter {
    pub fn new(
        group_model: Box<dyn ProbabilityClassifier>,
        group_labels: Box<dyn LabelDecoder>,
        exercise_model: Box<dyn ProbabilityClassifier>,
        exercise_labels: Box<dyn LabelDecoder>,
    ) -> Self {
        Self {
            group_model,
            group_labels,
            exercise_model,
            exercise_labels,
        }
    }

    /// Group probabilities with their decoded labels, aligned index-for-index.
    fn group_predictions(&self, features: &[f64]) -> Result<(Vec<f64>, Vec<String>), FlexionError> {
        let probs = self.group_model.predict_proba(features)?;
        let labels = self
            .group_labels
            .inverse_transform(self.group_model.classes())?;
        check_alignment(probs.len(), labels.len())?;
        Ok((probs, labels))
    }

    /// Exercise probabilities with their decoded names, aligned index-for-index.
    fn exercise_predictions(
        &self,
        features: &[f64],
    ) -> Result<(Vec<f64>, Vec<String>), FlexionError> {
        let probs = self.exercise_model.predict_proba(features)?;
        let names = self
            .exercise_labels
            .inverse_transform(self.exercise_model.classes())?;
        check_alignment(probs.len(), names.len())?;
        Ok((probs, names))
    }
}

fn check_alignment(probs: usize, labels: usize) -> Result<(), FlexionError> {
    if probs != labels {
        return Err(ModelError::ShapeMismatch {
            got: probs,
            expected: labels,
        }
        .into());
    }
    Ok(())
}

/// The optional outcome-estimation stage with its own encoder, since the
/// regressors were fit on a different column set than the classifiers.
pub struct OutcomeStage {
    encoder: FeatureEncoder,
    reduction_model: Box<dyn Regressor>,
    time_model: Box<dyn Regressor>,
}

impl OutcomeStage {
    pub fn new(
        encoder: FeatureEncoder,
        reduction_model: Box<dyn Regressor>,
        time_model: Box<dyn Regressor>,
    ) -> Self {
        Self {
            encoder,
            reduction_model,
            time_model,
        }
    }

    fn estimate(&self, profile: &PatientProfile) -> Result<OutcomeEstimate, FlexionError> {
        let features = self.encoder.encode(profile);
        let raw_reduction = self.reduction_model.predict(&features)?;
        let weeks = self.time_model.predict(&features)?;
        Ok(OutcomeEstimate::new(raw_reduction, weeks))
    }
}

/// Service producing ranked exercise recommendations.
///
/// All model state is immutable after construction; the service is shared
/// read-only across requests.
pub struct RecommendationService {
    encoder: FeatureEncoder,
    classifiers: ClassifierAdapter,
    outcome: Option<OutcomeStage>,
}

impl std::fmt::Debug for RecommendationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationService")
            .field("has_outcome", &self.outcome.is_some())
            .finish_non_exhaustive()
    }
}

impl RecommendationService {
    pub fn new(
        encoder: FeatureEncoder,
        classifiers: ClassifierAdapter,
        outcome: Option<OutcomeStage>,
    ) -> Self {
        Self {
            encoder,
            classifiers,
            outcome,
        }
    }

    /// Wire the service from loaded artifacts.
    ///
    /// # Errors
    /// Returns an error if the regression artifact set names an unknown
    /// numeric feature column.
    pub fn from_artifacts(
        classifier: ClassifierArtifacts,
        exercise_model: SoftmaxClassifier,
        regression: Option<RegressionArtifacts>,
    ) -> crate::Result<Self> {
        let encoder = FeatureEncoder::new(
            NUMERIC_KEYS.to_vec(),
            Box::new(classifier.symptoms),
            classifier.onehot_columns,
        );

        let classifiers = ClassifierAdapter::new(
            Box::new(classifier.group_model),
            Box::new(classifier.group_labels),
            Box::new(exercise_model),
            Box::new(classifier.exercise_labels),
        );

        let outcome = regression.map(Self::build_outcome_stage).transpose()?;

        Ok(Self::new(encoder, classifiers, outcome))
    }

    fn build_outcome_stage(reg: RegressionArtifacts) -> crate::Result<OutcomeStage> {
        let numeric = reg
            .numeric_fields
            .iter()
            .map(|name| {
                NumericKey::parse(name).ok_or_else(|| {
                    crate::adapters::ArtifactError::Malformed {
                        name: artifact::REG_FEATURE_COLS,
                        reason: format!("unknown numeric feature column \"{name}\""),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let encoder = FeatureEncoder::new(numeric, Box::new(reg.symptoms), reg.onehot_columns);
        Ok(OutcomeStage::new(
            encoder,
            Box::new(reg.reduction_model),
            Box::new(reg.time_model),
        ))
    }

    /// Whether the outcome-estimation stage is configured.
    #[must_use]
    pub fn outcome_enabled(&self) -> bool {
        self.outcome.is_some()
    }

    /// Run the full pipeline for one profile.
    ///
    /// # Errors
    /// Returns `FlexionError::Validation` for out-of-range answers or a
    /// patient below the age gate (no model is invoked in either case), and
    /// `FlexionError::Model` when inference itself fails.
    pub fn recommend(&self, profile: &PatientProfile) -> crate::Result<RecommendationReport> {
        profile
            .validate()
            .map_err(|errors| FlexionError::Validation(errors.join(", ")))?;
        profile.eligibility().map_err(FlexionError::Validation)?;

        let features = self.encoder.encode(profile);
        tracing::debug!("Encoded classification row with {} columns", features.len());

        let (group_probs, group_labels) = self.classifiers.group_predictions(&features)?;
        let (exercise_probs, exercise_names) = self.classifiers.exercise_predictions(&features)?;

        let lookup = GroupLookup::from_names(&exercise_names);
        let recommendations = rank(
            &group_probs,
            &group_labels,
            &exercise_probs,
            &exercise_names,
            &lookup,
        );

        let outcome = self.estimate_outcome(profile, &recommendations)?;

        tracing::info!(
            "Ranked {} groups, top {:?} at {:.1}% confidence",
            recommendations.len(),
            recommendations.first().map(|r| r.group),
            recommendations.first().map_or(0.0, |r| r.confidence),
        );

        Ok(RecommendationReport::new(recommendations, outcome))
    }

    fn estimate_outcome(
        &self,
        profile: &PatientProfile,
        recommendations: &[Recommendation],
    ) -> Result<Option<OutcomeEstimate>, FlexionError> {
        let Some(stage) = &self.outcome else {
            return Ok(None);
        };

        let top_exercise = recommendations
            .first()
            .and_then(|rec| rec.exercises.first());
        if top_exercise.is_none() {
            tracing::warn!("Top-ranked group has no mapped exercises, skipping outcome estimate");
            return Ok(None);
        }

        stage.estimate(profile).map(Some)
    }
}

/// Combine group and exercise probabilities into the ranked, grouped list.
///
/// Exactly the top 3 groups by probability, descending; ties keep the
/// original label-list order (stable sort, first seen wins). Per group, the
/// member exercises sort by their own model probability with the same stable
/// tie-break, and only the top 3 names survive.
fn rank(
    group_probs: &[f64],
    group_labels: &[String],
    exercise_probs: &[f64],
    exercise_names: &[String],
    lookup: &GroupLookup,
) -> Vec<Recommendation> {
    let mut order: Vec<usize> = (0..group_probs.len()).collect();
    order.sort_by(|&a, &b| {
        group_probs[b]
            .partial_cmp(&group_probs[a])
            .unwrap_or(Ordering::Equal)
    });

    order
        .into_iter()
        .take(TOP_GROUPS)
        .map(|idx| {
            let group = ExerciseGroup::from_label(&group_labels[idx]);
            let confidence = adjusted_confidence(group_probs[idx]);

            let mut members: Vec<usize> = (0..exercise_names.len())
                .filter(|&i| lookup.group_of(&exercise_names[i]) == group)
                .collect();
            members.sort_by(|&a, &b| {
                exercise_probs[b]
                    .partial_cmp(&exercise_probs[a])
                    .unwrap_or(Ordering::Equal)
            });

            let exercises = members
                .into_iter()
                .take(TOP_EXERCISES_PER_GROUP)
                .map(|i| exercise_names[i].clone())
                .collect();

            Recommendation {
                group,
                confidence,
                exercises,
            }
        })
        .collect()
}
