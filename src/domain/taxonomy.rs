//! Exercise taxonomy: static mapping from exercise name to functional group.
//!
//! The membership lists are fixed at build time and never mutated at runtime.
//! Anything unmatched maps to [`ExerciseGroup::Unknown`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Functional category of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseGroup {
    Stretching,
    Strength,
    Walking,
    Swimming,
    Others,
    Unknown,
}

impl ExerciseGroup {
    /// Parse a group label as produced by the group label decoder.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Stretching" => Self::Stretching,
            "Strength" => Self::Strength,
            "Walking" => Self::Walking,
            "Swimming" => Self::Swimming,
            "Others" => Self::Others,
            _ => Self::Unknown,
        }
    }

    /// Get the associated accent color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Stretching => (45, 212, 191), // Teal (#2DD4BF)
            Self::Strength => (251, 191, 36),   // Amber (#FBBF24)
            Self::Walking => (16, 185, 129),    // Emerald (#10B981)
            Self::Swimming => (59, 130, 246),   // Blue (#3B82F6)
            Self::Others => (148, 163, 184),    // Slate (#94A3B8)
            Self::Unknown => (100, 116, 139),   // Muted slate (#64748B)
        }
    }
}

impl std::fmt::Display for ExerciseGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stretching => write!(f, "Stretching"),
            Self::Strength => write!(f, "Strength"),
            Self::Walking => write!(f, "Walking"),
            Self::Swimming => write!(f, "Swimming"),
            Self::Others => write!(f, "Others"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Exercises in the Stretching group.
pub const STRETCHING: [&str; 19] = [
    "Heel and calf stretch (wall push)",
    "Leg curl (quadriceps stretch)",
    "Hamstring stretch",
    "Single hamstring stretch",
    "Straight leg stretch",
    "Standing or seated forward fold (toe touch)",
    "Leg cross",
    "Butterfly",
    "Standing adductor stretch (side lunge)",
    "Kneeling quad stretch",
    "Couch stretch",
    "Reclined hip twist",
    "Hip flexor stretch",
    "Ankle twist with band",
    "Seated figure 4 stretch",
    "Muscle stretch (push back of the knee down)",
    "Leg stretch (bend one knee up towards chest)",
    "Double knee to chest (knee hug)",
    "Iliotibial band stretch",
];

/// Exercises in the Strength group.
pub const STRENGTH: [&str; 23] = [
    "Knee extension",
    "Knee flexion",
    "Straight-leg raise",
    "Side leg raise (hip abduction)",
    "Prone leg raise",
    "Calf raise",
    "Quads exercise with roll (push knee down on the roll)",
    "Seated knee lift with or without resistance band",
    "Leg press with resistance band",
    "Side-steps with or without resistance band",
    "Speed skaters with or without resistance band",
    "Sit-to-stand",
    "Step up",
    "Knee marching",
    "Single leg balance (motionless)",
    "Squat",
    "Half squat",
    "Wall squat",
    "Kick back",
    "Bridging",
    "Plank",
    "Clamshell",
    "Leg cycle",
];

/// Exercises in the Others group.
pub const OTHERS: [&str; 9] = [
    "Running",
    "Biking (outdoor or stationary)",
    "Aerobics",
    "Water aerobics",
    "Weight training",
    "Yoga",
    "Tai Chi",
    "Pilates",
    "HIIT (high-intensity interval training)",
];

/// Map an exercise name to its functional group.
#[must_use]
pub fn group_for(exercise: &str) -> ExerciseGroup {
    if STRETCHING.contains(&exercise) {
        ExerciseGroup::Stretching
    } else if STRENGTH.contains(&exercise) {
        ExerciseGroup::Strength
    } else if exercise == "Walking" {
        ExerciseGroup::Walking
    } else if exercise == "Swimming" {
        ExerciseGroup::Swimming
    } else if OTHERS.contains(&exercise) {
        ExerciseGroup::Others
    } else {
        ExerciseGroup::Unknown
    }
}

/// Per-request name→group lookup, built once from the exercise model's
/// decoded class names.
#[derive(Debug, Clone)]
pub struct GroupLookup {
    map: HashMap<String, ExerciseGroup>,
}

impl GroupLookup {
    /// Build the lookup for a fixed list of exercise names.
    #[must_use]
    pub fn from_names(names: &[String]) -> Self {
        let map = names
            .iter()
            .map(|name| (name.clone(), group_for(name)))
            .collect();
        Self { map }
    }

    /// Group of an exercise; `Unknown` for names outside the lookup.
    #[must_use]
    pub fn group_of(&self, name: &str) -> ExerciseGroup {
        self.map.get(name).copied().unwrap_or(ExerciseGroup::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_for_known_exercises() {
        assert_eq!(group_for("Hamstring stretch"), ExerciseGroup::Stretching);
        assert_eq!(group_for("Wall squat"), ExerciseGroup::Strength);
        assert_eq!(group_for("Walking"), ExerciseGroup::Walking);
        assert_eq!(group_for("Swimming"), ExerciseGroup::Swimming);
        assert_eq!(group_for("Tai Chi"), ExerciseGroup::Others);
    }

    #[test]
    fn test_group_for_unknown_exercise() {
        assert_eq!(group_for("Underwater basket weaving"), ExerciseGroup::Unknown);
    }

    #[test]
    fn test_lookup_partitions_names() {
        let names = vec![
            "Hamstring stretch".to_string(),
            "Squat".to_string(),
            "Walking".to_string(),
            "Juggling".to_string(),
        ];
        let lookup = GroupLookup::from_names(&names);

        // Every name resolves to exactly one group.
        for name in &names {
            let group = lookup.group_of(name);
            let count = names
                .iter()
                .filter(|n| *n == name && lookup.group_of(n) == group)
                .count();
            assert_eq!(count, 1);
        }
        assert_eq!(lookup.group_of("Juggling"), ExerciseGroup::Unknown);
        assert_eq!(lookup.group_of("not in lookup"), ExerciseGroup::Unknown);
    }

    #[test]
    fn test_membership_lists_are_disjoint() {
        for ex in STRETCHING {
            assert!(!STRENGTH.contains(&ex));
            assert!(!OTHERS.contains(&ex));
        }
        for ex in STRENGTH {
            assert!(!OTHERS.contains(&ex));
        }
    }

    #[test]
    fn test_group_label_parsing() {
        assert_eq!(ExerciseGroup::from_label("Strength"), ExerciseGroup::Strength);
        assert_eq!(ExerciseGroup::from_label("strength"), ExerciseGroup::Unknown);
    }
}
