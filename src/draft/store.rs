use async_trait::async_trait;

use crate::error::{EngineError, StoreError};
use crate::model::{
    Assessment, AssessmentId, AssessmentRecord, CriteriaEvaluation, LevelKey, NewEvaluation,
    Progress, ProgressId, ProgressRecord, SubCompetencyId, SubjectId,
};

/// Persistence contract the engine writes drafts through and reads history from.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn create_draft_assessment(&self, subject_id: SubjectId)
    -> Result<AssessmentId, StoreError>;

    async fn get_assessment(&self, id: AssessmentId) -> Result<Assessment, StoreError>;

    /// Stamps `completed_at`. Does not check the current status.
    async fn complete_assessment(
        &self,
        id: AssessmentId,
        overall_score: f64,
        notes: Option<String>,
    ) -> Result<(), StoreError>;

    /// Insert-or-replace keyed by `(assessment_id, sub_competency_id)`.
    async fn upsert_progress(
        &self,
        assessment_id: AssessmentId,
        sub_competency_id: SubCompetencyId,
        current_level: LevelKey,
        notes: Option<String>,
    ) -> Result<ProgressId, StoreError>;

    /// Deletes every evaluation of `progress_id` and inserts the given set.
    async fn replace_evaluations(
        &self,
        progress_id: ProgressId,
        evaluations: Vec<NewEvaluation>,
    ) -> Result<(), StoreError>;

    /// Ordered by completion time, oldest first.
    async fn list_completed_assessments(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<Assessment>, StoreError>;

    async fn list_progress_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<Progress>, StoreError>;

    async fn list_evaluations_for_progress_ids(
        &self,
        ids: &[ProgressId],
    ) -> Result<Vec<CriteriaEvaluation>, StoreError>;
}

pub async fn load_assessment_record<S>(
    store: &S,
    id: AssessmentId,
) -> Result<AssessmentRecord, EngineError>
where
    S: AssessmentStore + ?Sized,
{
    let assessment = match store.get_assessment(id).await {
        Ok(assessment) => assessment,
        Err(StoreError::NotFound { .. }) => return Err(EngineError::AssessmentNotFound(id)),
        Err(err) => return Err(err.into()),
    };
    let progress = store.list_progress_for_assessment(id).await?;
    let ids = progress.iter().map(|p| p.id).collect::<Vec<_>>();
    let mut evaluations = store.list_evaluations_for_progress_ids(&ids).await?;

    let mut rows = Vec::with_capacity(progress.len());
    for progress in progress {
        let (mine, rest): (Vec<_>, Vec<_>) = evaluations
            .into_iter()
            .partition(|e| e.progress_id == progress.id);
        evaluations = rest;
        rows.push(ProgressRecord {
            progress,
            evaluations: mine,
        });
    }

    Ok(AssessmentRecord {
        assessment,
        progress: rows,
    })
}

/// The subject's most recently completed assessment, fully loaded.
pub async fn latest_completed_record<S>(
    store: &S,
    subject_id: SubjectId,
) -> Result<Option<AssessmentRecord>, EngineError>
where
    S: AssessmentStore + ?Sized,
{
    let completed = store.list_completed_assessments(subject_id).await?;
    match completed.last() {
        Some(latest) => Ok(Some(load_assessment_record(store, latest.id).await?)),
        None => Ok(None),
    }
}
