use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::levels::LevelKey;
use crate::model::rating::Rating;
use crate::model::{AssessmentId, EvaluationId, ProgressId, SubCompetencyId, SubjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    #[default]
    TeamMember,
    Candidate,
}

/// A team member or hiring candidate being assessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub current_level: LevelKey,
    #[serde(default)]
    pub kind: SubjectKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub subject_id: SubjectId,
    pub status: AssessmentStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub overall_score: Option<f64>,
    pub notes: Option<String>,
}

impl Assessment {
    pub fn is_completed(&self) -> bool {
        self.status == AssessmentStatus::Completed
    }
}

/// One row per (assessment, sub-competency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub id: ProgressId,
    pub assessment_id: AssessmentId,
    pub sub_competency_id: SubCompetencyId,
    pub current_level: LevelKey,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaEvaluation {
    pub id: EvaluationId,
    pub progress_id: ProgressId,
    pub criterion_text: String,
    pub evaluation: Rating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvaluation {
    pub criterion_text: String,
    pub evaluation: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecord {
    pub progress: Progress,
    pub evaluations: Vec<CriteriaEvaluation>,
}

/// An assessment joined with its progress rows and their evaluations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub assessment: Assessment,
    pub progress: Vec<ProgressRecord>,
}

impl AssessmentRecord {
    pub fn progress_for(&self, sub_competency_id: SubCompetencyId) -> Option<&ProgressRecord> {
        self.progress
            .iter()
            .find(|p| p.progress.sub_competency_id == sub_competency_id)
    }

    pub fn evaluations_for(&self, sub_competency_id: SubCompetencyId) -> &[CriteriaEvaluation] {
        self.progress_for(sub_competency_id)
            .map(|p| p.evaluations.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_evaluations(&self, sub_competency_id: SubCompetencyId) -> bool {
        !self.evaluations_for(sub_competency_id).is_empty()
    }
}
