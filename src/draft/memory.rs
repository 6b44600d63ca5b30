use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::draft::store::AssessmentStore;
use crate::error::StoreError;
use crate::model::{
    Assessment, AssessmentId, AssessmentStatus, CriteriaEvaluation, EvaluationId, LevelKey,
    NewEvaluation, Progress, ProgressId, SubCompetencyId, SubjectId,
};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: u64,
    assessments: BTreeMap<AssessmentId, Assessment>,
    progress: BTreeMap<ProgressId, Progress>,
    evaluations: BTreeMap<ProgressId, Vec<CriteriaEvaluation>>,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-local store with the same upsert and full-replace semantics as the
/// hosted one. Ids are allocated from a single counter.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completion with an explicit timestamp, for importing history.
    pub async fn complete_assessment_at(
        &self,
        id: AssessmentId,
        overall_score: f64,
        notes: Option<String>,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let assessment = state
            .assessments
            .get_mut(&id)
            .ok_or_else(|| not_found("assessment", id))?;
        assessment.status = AssessmentStatus::Completed;
        assessment.completed_at = Some(completed_at);
        assessment.overall_score = Some(overall_score);
        if notes.is_some() {
            assessment.notes = notes;
        }
        debug!(assessment_id = %id, overall_score, "assessment completed");
        Ok(())
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn create_draft_assessment(
        &self,
        subject_id: SubjectId,
    ) -> Result<AssessmentId, StoreError> {
        let mut state = self.state.write().await;
        let id = AssessmentId(state.next_id());
        state.assessments.insert(
            id,
            Assessment {
                id,
                subject_id,
                status: AssessmentStatus::Draft,
                created_at: Utc::now(),
                completed_at: None,
                overall_score: None,
                notes: None,
            },
        );
        debug!(assessment_id = %id, subject_id = %subject_id, "draft assessment created");
        Ok(id)
    }

    async fn get_assessment(&self, id: AssessmentId) -> Result<Assessment, StoreError> {
        let state = self.state.read().await;
        state
            .assessments
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("assessment", id))
    }

    async fn complete_assessment(
        &self,
        id: AssessmentId,
        overall_score: f64,
        notes: Option<String>,
    ) -> Result<(), StoreError> {
        self.complete_assessment_at(id, overall_score, notes, Utc::now())
            .await
    }

    async fn upsert_progress(
        &self,
        assessment_id: AssessmentId,
        sub_competency_id: SubCompetencyId,
        current_level: LevelKey,
        notes: Option<String>,
    ) -> Result<ProgressId, StoreError> {
        let mut state = self.state.write().await;
        if !state.assessments.contains_key(&assessment_id) {
            return Err(not_found("assessment", assessment_id));
        }

        let existing = state.progress.values_mut().find(|p| {
            p.assessment_id == assessment_id && p.sub_competency_id == sub_competency_id
        });
        if let Some(progress) = existing {
            progress.current_level = current_level;
            progress.notes = notes;
            return Ok(progress.id);
        }

        let id = ProgressId(state.next_id());
        state.progress.insert(
            id,
            Progress {
                id,
                assessment_id,
                sub_competency_id,
                current_level,
                notes,
            },
        );
        Ok(id)
    }

    async fn replace_evaluations(
        &self,
        progress_id: ProgressId,
        evaluations: Vec<NewEvaluation>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.progress.contains_key(&progress_id) {
            return Err(not_found("progress", progress_id));
        }

        let mut rows = Vec::with_capacity(evaluations.len());
        for evaluation in evaluations {
            rows.push(CriteriaEvaluation {
                id: EvaluationId(state.next_id()),
                progress_id,
                criterion_text: evaluation.criterion_text,
                evaluation: evaluation.evaluation,
            });
        }
        state.evaluations.insert(progress_id, rows);
        Ok(())
    }

    async fn list_completed_assessments(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<Assessment>, StoreError> {
        let state = self.state.read().await;
        let mut out = state
            .assessments
            .values()
            .filter(|a| a.subject_id == subject_id && a.is_completed())
            .cloned()
            .collect::<Vec<_>>();
        out.sort_by(|a, b| a.completed_at.cmp(&b.completed_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn list_progress_for_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<Progress>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .progress
            .values()
            .filter(|p| p.assessment_id == assessment_id)
            .cloned()
            .collect())
    }

    async fn list_evaluations_for_progress_ids(
        &self,
        ids: &[ProgressId],
    ) -> Result<Vec<CriteriaEvaluation>, StoreError> {
        let state = self.state.read().await;
        let mut out = Vec::new();
        for id in ids {
            if let Some(rows) = state.evaluations.get(id) {
                out.extend(rows.iter().cloned());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/draft/memory.rs"]
mod tests;
