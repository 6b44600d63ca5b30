pub mod json;
pub mod text;

use serde::Serialize;
use tracing::debug;

use crate::draft::latest_completed_record;
use crate::error::EngineError;
use crate::input::LoadedDataset;
use crate::model::{AssessmentId, AssessmentRecord, RoleType, Subject, SubjectKind};
use crate::scoring::gaps::{HiringGap, hiring_gaps};
use crate::scoring::member::{CompetencySummary, summarize_member};
use crate::scoring::team::{TeamMember, TeamRadar, team_radar};
use crate::scoring::{ScoringProfile, ScoringStrategy};
use crate::trend::{TrendReport, subject_trend};

#[derive(Debug, Clone, Serialize)]
pub struct SubjectReport {
    pub subject: Subject,
    pub latest_assessment: Option<AssessmentId>,
    pub coverage: Option<f64>,
    pub summaries: Vec<CompetencySummary>,
    pub trend: Option<TrendReport>,
    pub team_trend: Option<TrendReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub role_type: RoleType,
    pub radar: TeamRadar,
    pub hiring_gaps: Vec<HiringGap>,
    pub subjects: Vec<SubjectReport>,
}

/// Team radar and gaps from every team member's latest completed assessment,
/// plus per-subject summaries and trends. Candidates are reported but kept out
/// of the team composition.
pub async fn build_report(
    loaded: &LoadedDataset,
    profile: &ScoringProfile,
) -> Result<TeamReport, EngineError> {
    let mut latest: Vec<(&Subject, Option<AssessmentRecord>)> = Vec::new();
    for subject in &loaded.subjects {
        let record = latest_completed_record(&loaded.store, subject.id).await?;
        latest.push((subject, record));
    }

    let members = latest
        .iter()
        .filter(|(s, _)| s.kind == SubjectKind::TeamMember)
        .filter_map(|(subject, record)| {
            record.as_ref().map(|record| TeamMember {
                subject: *subject,
                record,
            })
        })
        .collect::<Vec<_>>();
    let radar = team_radar(&loaded.catalog, &members, profile);
    let gaps = hiring_gaps(&loaded.catalog, &radar, profile);
    debug!(members = members.len(), "team radar computed");

    let mut subjects = Vec::with_capacity(latest.len());
    for (subject, record) in &latest {
        let summaries = record
            .as_ref()
            .map(|r| summarize_member(&loaded.catalog, r, profile))
            .unwrap_or_default();
        let trend = optional_trend(loaded, subject, ScoringStrategy::MemberRelative, profile).await?;
        let team_trend =
            optional_trend(loaded, subject, ScoringStrategy::TeamRelative, profile).await?;
        subjects.push(SubjectReport {
            subject: (*subject).clone(),
            latest_assessment: record.as_ref().map(|r| r.assessment.id),
            coverage: record.as_ref().and_then(|r| r.assessment.overall_score),
            summaries,
            trend,
            team_trend,
        });
    }

    Ok(TeamReport {
        role_type: loaded.catalog.role_type(),
        radar,
        hiring_gaps: gaps,
        subjects,
    })
}

async fn optional_trend(
    loaded: &LoadedDataset,
    subject: &Subject,
    strategy: ScoringStrategy,
    profile: &ScoringProfile,
) -> Result<Option<TrendReport>, EngineError> {
    match subject_trend(&loaded.store, &loaded.catalog, subject, strategy, profile).await {
        Ok(report) => Ok(Some(report)),
        Err(EngineError::NotEnoughAssessments(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn format_score(v: f64) -> String {
    format!("{:.2}", v)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
