use serde::Serialize;

use crate::model::rating::Rating;
use crate::model::{
    AssessmentRecord, Catalog, Competency, CompetencyId, LevelKey, SubCompetency,
    SubCompetencyId, Subject,
};
use crate::scoring::{ScoringProfile, mean};

/// A subject together with the assessment that represents them in a team view.
#[derive(Debug, Clone, Copy)]
pub struct TeamMember<'a> {
    pub subject: &'a Subject,
    pub record: &'a AssessmentRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScore<K> {
    pub id: K,
    pub title: String,
    pub score: f64,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRadar {
    pub max_possible_score: f64,
    pub competencies: Vec<TeamScore<CompetencyId>>,
    pub sub_competencies: Vec<TeamScore<SubCompetencyId>>,
}

impl TeamRadar {
    pub fn competency(&self, id: CompetencyId) -> Option<&TeamScore<CompetencyId>> {
        self.competencies.iter().find(|s| s.id == id)
    }

    pub fn sub_competency(&self, id: SubCompetencyId) -> Option<&TeamScore<SubCompetencyId>> {
        self.sub_competencies.iter().find(|s| s.id == id)
    }
}

/// Evenly spaced anchor for a level: lowest level gets one step, next gets two, ...
pub fn base_score(level: LevelKey, profile: &ScoringProfile) -> f64 {
    (level.index() as f64 + 1.0) * profile.base_score_step
}

/// Ceiling for the current team composition: the best reachable score of any
/// level present, never below the profile floor.
pub fn max_possible_score<I>(levels: I, profile: &ScoringProfile) -> f64
where
    I: IntoIterator<Item = LevelKey>,
{
    let best_modifier = f64::from(Rating::WellAbove.modifier());
    levels
        .into_iter()
        .map(|level| base_score(level, profile) + best_modifier)
        .fold(profile.max_score_floor, f64::max)
}

pub fn average_modifier<I>(ratings: I) -> Option<f64>
where
    I: IntoIterator<Item = Rating>,
{
    let mut sum = 0i32;
    let mut count = 0u32;
    for rating in ratings {
        sum += i32::from(rating.modifier());
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(f64::from(sum) / f64::from(count))
}

/// `clamp(base(level) + avg modifier, 0, max_score)`, or `None` with no ratings.
pub fn member_score<I>(
    level: LevelKey,
    ratings: I,
    max_score: f64,
    profile: &ScoringProfile,
) -> Option<f64>
where
    I: IntoIterator<Item = Rating>,
{
    let modifier = average_modifier(ratings)?;
    let raw = base_score(level, profile) + modifier;
    Some(raw.max(0.0).min(max_score))
}

pub fn member_competency_score(
    competency: &Competency,
    level: LevelKey,
    record: &AssessmentRecord,
    max_score: f64,
    profile: &ScoringProfile,
) -> Option<f64> {
    let ratings = competency
        .sub_competencies
        .iter()
        .flat_map(|sub| record.evaluations_for(sub.id))
        .map(|e| e.evaluation);
    member_score(level, ratings, max_score, profile)
}

pub fn member_sub_competency_score(
    sub: &SubCompetency,
    level: LevelKey,
    record: &AssessmentRecord,
    max_score: f64,
    profile: &ScoringProfile,
) -> Option<f64> {
    let ratings = record.evaluations_for(sub.id).iter().map(|e| e.evaluation);
    member_score(level, ratings, max_score, profile)
}

/// Team-relative scores per competency and sub-competency. Only members with at
/// least one evaluation in scope count towards an average.
pub fn team_radar(
    catalog: &Catalog,
    members: &[TeamMember<'_>],
    profile: &ScoringProfile,
) -> TeamRadar {
    let max_score = max_possible_score(members.iter().map(|m| m.subject.current_level), profile);

    let mut competencies = Vec::with_capacity(catalog.competencies().len());
    let mut sub_competencies = Vec::with_capacity(catalog.sub_competency_count());

    for competency in catalog.competencies() {
        let scores = members
            .iter()
            .filter_map(|m| {
                member_competency_score(
                    competency,
                    m.subject.current_level,
                    m.record,
                    max_score,
                    profile,
                )
            })
            .collect::<Vec<_>>();
        competencies.push(TeamScore {
            id: competency.id,
            title: competency.title.clone(),
            score: mean(&scores).unwrap_or(0.0),
            member_count: scores.len(),
        });

        for sub in &competency.sub_competencies {
            let scores = members
                .iter()
                .filter_map(|m| {
                    member_sub_competency_score(
                        sub,
                        m.subject.current_level,
                        m.record,
                        max_score,
                        profile,
                    )
                })
                .collect::<Vec<_>>();
            sub_competencies.push(TeamScore {
                id: sub.id,
                title: sub.title.clone(),
                score: mean(&scores).unwrap_or(0.0),
                member_count: scores.len(),
            });
        }
    }

    TeamRadar {
        max_possible_score: max_score,
        competencies,
        sub_competencies,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/team.rs"]
mod tests;
