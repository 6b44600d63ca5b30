use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{Catalog, CompetencyId, SubCompetencyId};
use crate::scoring::ScoringProfile;
use crate::scoring::team::TeamRadar;

/// Hiring-gap priority. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPriority {
    NotAssessed,
    High,
    Medium,
    Strength,
}

impl GapPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            GapPriority::NotAssessed => "not_assessed",
            GapPriority::High => "high",
            GapPriority::Medium => "medium",
            GapPriority::Strength => "strength",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillHint {
    pub sub_competency_id: SubCompetencyId,
    pub title: String,
    pub score: f64,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiringGap {
    pub competency_id: CompetencyId,
    pub title: String,
    pub score: f64,
    pub member_count: usize,
    pub priority: GapPriority,
    pub skills_to_look_for: Vec<SkillHint>,
}

pub fn classify_priority(score: f64, member_count: usize, profile: &ScoringProfile) -> GapPriority {
    if member_count == 0 {
        GapPriority::NotAssessed
    } else if score < profile.priority_high_below {
        GapPriority::High
    } else if score < profile.priority_medium_below {
        GapPriority::Medium
    } else {
        GapPriority::Strength
    }
}

/// Gaps sorted by priority, then weakest score first.
pub fn hiring_gaps(catalog: &Catalog, radar: &TeamRadar, profile: &ScoringProfile) -> Vec<HiringGap> {
    let mut gaps = Vec::with_capacity(radar.competencies.len());
    for team_score in &radar.competencies {
        let Some(competency) = catalog.competency(team_score.id) else {
            continue;
        };

        let mut hints = competency
            .sub_competencies
            .iter()
            .filter_map(|sub| radar.sub_competency(sub.id))
            .map(|s| SkillHint {
                sub_competency_id: s.id,
                title: s.title.clone(),
                score: s.score,
                member_count: s.member_count,
            })
            .collect::<Vec<_>>();
        // unassessed skills sort first, like unassessed competencies
        hints.sort_by(|a, b| {
            (a.member_count > 0)
                .cmp(&(b.member_count > 0))
                .then_with(|| a.score.total_cmp(&b.score))
        });
        hints.truncate(profile.skills_to_look_for);

        gaps.push(HiringGap {
            competency_id: team_score.id,
            title: team_score.title.clone(),
            score: team_score.score,
            member_count: team_score.member_count,
            priority: classify_priority(team_score.score, team_score.member_count, profile),
            skills_to_look_for: hints,
        });
    }

    gaps.sort_by(compare_gaps);
    gaps
}

fn compare_gaps(a: &HiringGap, b: &HiringGap) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.score.total_cmp(&b.score))
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/gaps.rs"]
mod tests;
