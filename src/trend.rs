use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::draft::store::{AssessmentStore, load_assessment_record};
use crate::error::EngineError;
use crate::model::{AssessmentId, Catalog, CompetencyId, SubCompetencyId, Subject};
use crate::scoring::{ScoredAssessment, ScoringProfile, ScoringStrategy, score_assessment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }
}

/// Strict on both sides: a diff of exactly the threshold is stable.
pub fn classify_trend(diff: f64, threshold: f64) -> Trend {
    if diff > threshold {
        Trend::Improving
    } else if diff < -threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendDelta {
    pub first: f64,
    pub last: f64,
    pub diff: f64,
    pub trend: Trend,
}

/// Differences are compared at this resolution so that float noise such as
/// `1.3 - 1.0 = 0.30000000000000004` does not cross the threshold.
const DIFF_RESOLUTION: f64 = 1e9;

impl TrendDelta {
    pub fn between(first: f64, last: f64, threshold: f64) -> Self {
        let diff = ((last - first) * DIFF_RESOLUTION).round() / DIFF_RESOLUTION;
        Self {
            first,
            last,
            diff,
            trend: classify_trend(diff, threshold),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendSummary {
    pub improving: usize,
    pub stable: usize,
    pub declining: usize,
}

impl TrendSummary {
    pub fn tally<'a, I>(deltas: I) -> Self
    where
        I: IntoIterator<Item = &'a TrendDelta>,
    {
        let mut summary = Self::default();
        for delta in deltas {
            match delta.trend {
                Trend::Improving => summary.improving += 1,
                Trend::Stable => summary.stable += 1,
                Trend::Declining => summary.declining += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub assessment_id: AssessmentId,
    pub completed_at: Option<DateTime<Utc>>,
    pub overall: Option<f64>,
    pub competency_scores: BTreeMap<CompetencyId, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub strategy: ScoringStrategy,
    pub assessments: usize,
    pub overall: Option<TrendDelta>,
    pub competencies: BTreeMap<CompetencyId, TrendDelta>,
    pub sub_competencies: BTreeMap<SubCompetencyId, TrendDelta>,
    pub summary: TrendSummary,
    pub series: Vec<TrendPoint>,
}

/// Deltas for keys scored in both snapshots. Keys missing from either side have
/// nothing to compare and are left out.
pub fn compare_scores<K>(
    first: &BTreeMap<K, f64>,
    last: &BTreeMap<K, f64>,
    threshold: f64,
) -> BTreeMap<K, TrendDelta>
where
    K: Ord + Copy,
{
    first
        .iter()
        .filter_map(|(key, &a)| {
            last.get(key)
                .map(|&b| (*key, TrendDelta::between(a, b, threshold)))
        })
        .collect()
}

/// Compares the first and last of the scored assessments after ordering them by
/// completion time, and keeps every assessment as a series point.
pub fn build_trend_report(
    scored: &[ScoredAssessment],
    profile: &ScoringProfile,
) -> Result<TrendReport, EngineError> {
    if scored.len() < 2 {
        return Err(EngineError::NotEnoughAssessments(scored.len()));
    }

    let mut ordered = scored.iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| {
        a.completed_at
            .cmp(&b.completed_at)
            .then_with(|| a.assessment_id.cmp(&b.assessment_id))
    });

    let first = ordered[0];
    let last = ordered[ordered.len() - 1];
    let threshold = profile.trend_threshold;

    let competencies = compare_scores(
        &first.competency_scores,
        &last.competency_scores,
        threshold,
    );
    let sub_competencies = compare_scores(
        &first.sub_competency_scores,
        &last.sub_competency_scores,
        threshold,
    );
    let overall = match (first.overall(), last.overall()) {
        (Some(a), Some(b)) => Some(TrendDelta::between(a, b, threshold)),
        _ => None,
    };

    let series = ordered
        .iter()
        .map(|s| TrendPoint {
            assessment_id: s.assessment_id,
            completed_at: s.completed_at,
            overall: s.overall(),
            competency_scores: s.competency_scores.clone(),
        })
        .collect();

    Ok(TrendReport {
        strategy: first.strategy,
        assessments: ordered.len(),
        overall,
        summary: TrendSummary::tally(competencies.values()),
        competencies,
        sub_competencies,
        series,
    })
}

/// Loads every completed assessment of `subject` and builds its trend report.
pub async fn subject_trend<S>(
    store: &S,
    catalog: &Catalog,
    subject: &Subject,
    strategy: ScoringStrategy,
    profile: &ScoringProfile,
) -> Result<TrendReport, EngineError>
where
    S: AssessmentStore + ?Sized,
{
    let completed = store.list_completed_assessments(subject.id).await?;
    debug!(
        subject_id = %subject.id,
        assessments = completed.len(),
        strategy = strategy.as_str(),
        "building trend report"
    );

    let mut scored = Vec::with_capacity(completed.len());
    for assessment in &completed {
        let record = load_assessment_record(store, assessment.id).await?;
        scored.push(score_assessment(
            strategy,
            catalog,
            &record,
            subject.current_level,
            profile,
        ));
    }
    build_trend_report(&scored, profile)
}

#[cfg(test)]
#[path = "../tests/src_inline/trend.rs"]
mod tests;
