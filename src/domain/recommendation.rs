//! Recommendation result types.
//!
//! Represents the displayed payload of one recommendation request. Reports
//! are created per request and never persisted.

use serde::{Deserialize, Serialize};

use super::taxonomy::ExerciseGroup;

/// One ranked group with its adjusted confidence and top exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Functional exercise group
    pub group: ExerciseGroup,

    /// Adjusted confidence (0.0-100.0, one decimal)
    pub confidence: f64,

    /// Up to 3 exercise names, best first. May be empty when the taxonomy
    /// maps no model exercise into this group.
    pub exercises: Vec<String>,
}

/// Predicted effect of the top-ranked exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEstimate {
    /// Predicted pain reduction in points, always non-negative.
    pub pain_reduction: f64,

    /// Predicted weeks until the effect shows. Reported as-is, including
    /// fractional values.
    pub weeks_to_effect: f64,
}

impl OutcomeEstimate {
    /// Build an estimate from raw regressor outputs.
    ///
    /// A regressor may emit a negative "reduction", which is semantically
    /// invalid; the magnitude is reported instead.
    #[must_use]
    pub fn new(raw_reduction: f64, weeks_to_effect: f64) -> Self {
        Self {
            pain_reduction: raw_reduction.abs(),
            weeks_to_effect,
        }
    }
}

/// Complete recommendation payload for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    /// Ranked groups, best first (up to 3).
    pub recommendations: Vec<Recommendation>,

    /// Outcome estimate for the top exercise, when the outcome stage ran.
    pub outcome: Option<OutcomeEstimate>,

    /// Timestamp of the request
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RecommendationReport {
    /// Create a new report stamped with the current time.
    #[must_use]
    pub fn new(recommendations: Vec<Recommendation>, outcome: Option<OutcomeEstimate>) -> Self {
        Self {
            recommendations,
            outcome,
            created_at: chrono::Utc::now(),
        }
    }

    /// The single top exercise: rank-1 group, rank-1 exercise.
    #[must_use]
    pub fn top_exercise(&self) -> Option<&str> {
        self.recommendations
            .first()
            .and_then(|rec| rec.exercises.first())
            .map(String::as_str)
    }

    /// Human-readable outcome line for display.
    #[must_use]
    pub fn outcome_summary(&self) -> Option<String> {
        let outcome = self.outcome?;
        let exercise = self.top_exercise()?;
        Some(format!(
            "By using {}, you may reduce your pain by {:.1} points in about {:.1} weeks.",
            exercise, outcome.pain_reduction, outcome.weeks_to_effect
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_reduction_is_reported_as_magnitude() {
        let estimate = OutcomeEstimate::new(-2.3, 4.0);
        assert!((estimate.pain_reduction - 2.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weeks_are_unclamped() {
        let estimate = OutcomeEstimate::new(1.0, 0.3);
        assert!((estimate.weeks_to_effect - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_exercise() {
        let report = RecommendationReport::new(
            vec![
                Recommendation {
                    group: ExerciseGroup::Strength,
                    confidence: 75.0,
                    exercises: vec!["Squat".to_string(), "Step up".to_string()],
                },
                Recommendation {
                    group: ExerciseGroup::Walking,
                    confidence: 50.0,
                    exercises: vec!["Walking".to_string()],
                },
            ],
            None,
        );
        assert_eq!(report.top_exercise(), Some("Squat"));
        assert!(report.outcome_summary().is_none());
    }

    #[test]
    fn test_top_exercise_with_empty_top_bucket() {
        let report = RecommendationReport::new(
            vec![Recommendation {
                group: ExerciseGroup::Unknown,
                confidence: 90.0,
                exercises: vec![],
            }],
            None,
        );
        assert_eq!(report.top_exercise(), None);
    }

    #[test]
    fn test_outcome_summary_format() {
        let report = RecommendationReport::new(
            vec![Recommendation {
                group: ExerciseGroup::Walking,
                confidence: 100.0,
                exercises: vec!["Walking".to_string()],
            }],
            Some(OutcomeEstimate::new(-1.26, 3.94)),
        );
        let line = report.outcome_summary().expect("summary");
        assert_eq!(
            line,
            "By using Walking, you may reduce your pain by 1.3 points in about 3.9 weeks."
        );
    }
}
