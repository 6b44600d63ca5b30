use serde::Serialize;

use crate::model::rating::{Rating, worst_rating};
use crate::model::{AssessmentRecord, Catalog, CompetencyId, CriteriaEvaluation, SubCompetencyId};
use crate::scoring::ScoringProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemberOutlook {
    #[serde(rename = "level-up")]
    LevelUp,
    #[serde(rename = "on-track")]
    OnTrack,
    #[serde(rename = "needs-support")]
    NeedsSupport,
}

impl MemberOutlook {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberOutlook::LevelUp => "level-up",
            MemberOutlook::OnTrack => "on-track",
            MemberOutlook::NeedsSupport => "needs-support",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCompetencySummary {
    pub sub_competency_id: SubCompetencyId,
    pub title: String,
    pub average: f64,
    pub outlook: MemberOutlook,
    pub worst: Option<Rating>,
    pub evaluated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetencySummary {
    pub competency_id: CompetencyId,
    pub title: String,
    pub average: f64,
    pub outlook: MemberOutlook,
    pub recommendation: String,
    pub sub_competencies: Vec<SubCompetencySummary>,
}

/// Plain 1.0-5.0 mean of the rating scores. `None` for an empty set.
pub fn member_average<I>(ratings: I) -> Option<f64>
where
    I: IntoIterator<Item = Rating>,
{
    let mut sum = 0u32;
    let mut count = 0u32;
    for rating in ratings {
        sum += u32::from(rating.score());
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(f64::from(sum) / f64::from(count))
}

pub fn classify_member(average: f64, profile: &ScoringProfile) -> MemberOutlook {
    if average >= profile.level_up_min {
        MemberOutlook::LevelUp
    } else if average < profile.needs_support_below {
        MemberOutlook::NeedsSupport
    } else {
        MemberOutlook::OnTrack
    }
}

pub fn build_recommendation(
    evaluations: &[&CriteriaEvaluation],
    outlook: MemberOutlook,
    profile: &ScoringProfile,
) -> String {
    let improvements = evaluations
        .iter()
        .filter(|e| e.evaluation.is_below_target())
        .take(profile.recommendation_samples)
        .map(|e| improvement_statement(&e.criterion_text))
        .collect::<Vec<_>>();
    let strengths = evaluations
        .iter()
        .filter(|e| e.evaluation.is_above_target())
        .take(profile.recommendation_samples)
        .map(|e| e.criterion_text.trim().to_string())
        .collect::<Vec<_>>();

    match outlook {
        MemberOutlook::LevelUp => {
            if strengths.is_empty() {
                "Consistently performing above the current level; consider readiness for the next level.".to_string()
            } else {
                format!(
                    "Consistently performing above the current level, notably: {}. Consider readiness for the next level.",
                    strengths.join("; ")
                )
            }
        }
        MemberOutlook::NeedsSupport => {
            if improvements.is_empty() {
                "Needs support to meet the current level; agree on a focused development plan."
                    .to_string()
            } else {
                format!(
                    "Needs support to meet the current level. Start with: {}.",
                    improvements.join("; ")
                )
            }
        }
        MemberOutlook::OnTrack => {
            if improvements.is_empty() {
                "Performing at the expected level; keep building on current strengths.".to_string()
            } else {
                format!(
                    "Performing at the expected level. Growth areas: {}.",
                    improvements.join("; ")
                )
            }
        }
    }
}

/// "Writes clear design docs." -> "work on writes clear design docs"
fn improvement_statement(criterion: &str) -> String {
    let text = criterion.trim().trim_end_matches('.');
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("work on {}{}", first.to_lowercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Member-relative summaries for one assessment, in catalog order. Competencies
/// and sub-competencies without evaluations are skipped.
pub fn summarize_member(
    catalog: &Catalog,
    record: &AssessmentRecord,
    profile: &ScoringProfile,
) -> Vec<CompetencySummary> {
    let mut out = Vec::new();
    for competency in catalog.competencies() {
        let mut in_scope: Vec<&CriteriaEvaluation> = Vec::new();
        let mut subs = Vec::new();
        for sub in &competency.sub_competencies {
            let evaluations = record.evaluations_for(sub.id);
            let Some(average) = member_average(evaluations.iter().map(|e| e.evaluation)) else {
                continue;
            };
            subs.push(SubCompetencySummary {
                sub_competency_id: sub.id,
                title: sub.title.clone(),
                average,
                outlook: classify_member(average, profile),
                worst: worst_rating(evaluations.iter().map(|e| e.evaluation)),
                evaluated: evaluations.len(),
            });
            in_scope.extend(evaluations.iter());
        }

        let Some(average) = member_average(in_scope.iter().map(|e| e.evaluation)) else {
            continue;
        };
        let outlook = classify_member(average, profile);
        out.push(CompetencySummary {
            competency_id: competency.id,
            title: competency.title.clone(),
            average,
            outlook,
            recommendation: build_recommendation(&in_scope, outlook, profile),
            sub_competencies: subs,
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/member.rs"]
mod tests;
