use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringProfile {
    /// Member-relative average at or above this reads as ready for the next level.
    pub level_up_min: f64,
    /// Member-relative average strictly below this reads as needing support.
    pub needs_support_below: f64,
    /// Trend dead band; a diff must exceed it strictly to count as movement.
    pub trend_threshold: f64,
    pub priority_high_below: f64,
    pub priority_medium_below: f64,
    /// Spacing between consecutive levels' base scores.
    pub base_score_step: f64,
    pub max_score_floor: f64,
    pub recommendation_samples: usize,
    pub skills_to_look_for: usize,
}

impl ScoringProfile {
    pub fn default_v1() -> Self {
        Self {
            level_up_min: 4.0,
            needs_support_below: 2.5,
            trend_threshold: 0.3,
            priority_high_below: 4.0,
            priority_medium_below: 6.0,
            base_score_step: 2.0,
            max_score_floor: 6.0,
            recommendation_samples: 2,
            skills_to_look_for: 3,
        }
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}
