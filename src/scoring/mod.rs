use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AssessmentId, AssessmentRecord, Catalog, CompetencyId, LevelKey, SubCompetencyId};

pub mod gaps;
pub mod member;
pub mod profile;
pub mod team;

pub use profile::ScoringProfile;

/// Which of the two aggregation formulas a caller wants. They are not
/// interchangeable: member-relative is a raw 1-5 mean, team-relative is anchored
/// to the subject's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    MemberRelative,
    TeamRelative,
}

impl ScoringStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringStrategy::MemberRelative => "member_relative",
            ScoringStrategy::TeamRelative => "team_relative",
        }
    }
}

/// Per-competency and per-sub-competency scores of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAssessment {
    pub assessment_id: AssessmentId,
    pub completed_at: Option<DateTime<Utc>>,
    pub strategy: ScoringStrategy,
    pub competency_scores: BTreeMap<CompetencyId, f64>,
    pub sub_competency_scores: BTreeMap<SubCompetencyId, f64>,
}

impl ScoredAssessment {
    /// Mean of the competency scores.
    pub fn overall(&self) -> Option<f64> {
        let values = self.competency_scores.values().copied().collect::<Vec<_>>();
        mean(&values)
    }
}

/// Scores one assessment with the chosen strategy. `subject_level` anchors the
/// team-relative arm; the member-relative arm ignores it. The team ceiling for a
/// single assessment is computed from that one level.
pub fn score_assessment(
    strategy: ScoringStrategy,
    catalog: &Catalog,
    record: &AssessmentRecord,
    subject_level: LevelKey,
    profile: &ScoringProfile,
) -> ScoredAssessment {
    let max_score = team::max_possible_score([subject_level], profile);
    let mut competency_scores = BTreeMap::new();
    let mut sub_competency_scores = BTreeMap::new();

    for competency in catalog.competencies() {
        let score = match strategy {
            ScoringStrategy::MemberRelative => member::member_average(
                competency
                    .sub_competencies
                    .iter()
                    .flat_map(|sub| record.evaluations_for(sub.id))
                    .map(|e| e.evaluation),
            ),
            ScoringStrategy::TeamRelative => team::member_competency_score(
                competency,
                subject_level,
                record,
                max_score,
                profile,
            ),
        };
        if let Some(score) = score {
            competency_scores.insert(competency.id, score);
        }

        for sub in &competency.sub_competencies {
            let score = match strategy {
                ScoringStrategy::MemberRelative => member::member_average(
                    record.evaluations_for(sub.id).iter().map(|e| e.evaluation),
                ),
                ScoringStrategy::TeamRelative => team::member_sub_competency_score(
                    sub,
                    subject_level,
                    record,
                    max_score,
                    profile,
                ),
            };
            if let Some(score) = score {
                sub_competency_scores.insert(sub.id, score);
            }
        }
    }

    ScoredAssessment {
        assessment_id: record.assessment.id,
        completed_at: record.assessment.completed_at,
        strategy,
        competency_scores,
        sub_competency_scores,
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/mod.rs"]
mod tests;
