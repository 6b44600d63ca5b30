use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::draft::prompts::{PromptGenerator, SubCompetencyPrompts, align_prompts};
use crate::draft::steps::{StepPlan, WizardStep};
use crate::draft::store::{AssessmentStore, latest_completed_record, load_assessment_record};
use crate::error::{EngineError, StoreError};
use crate::model::catalog::validate_notes;
use crate::model::criteria::criteria_for_level_with_fallback;
use crate::model::rating::{DEFAULT_RATING, worst_rating};
use crate::model::{
    AssessmentId, AssessmentStatus, Catalog, LevelKey, NewEvaluation, ProgressRecord, Rating,
    SubCompetency, SubCompetencyId, Subject,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub debounce_ms: u64,
}

impl SessionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// In-memory state of one wizard step. Ratings are keyed by criterion text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDraft {
    pub level: LevelKey,
    pub notes: String,
    pub ratings: BTreeMap<String, Rating>,
}

impl StepDraft {
    pub fn new(level: LevelKey) -> Self {
        Self {
            level,
            notes: String::new(),
            ratings: BTreeMap::new(),
        }
    }

    pub fn from_record(row: &ProgressRecord) -> Self {
        Self {
            level: row.progress.current_level,
            notes: row.progress.notes.clone().unwrap_or_default(),
            ratings: row
                .evaluations
                .iter()
                .map(|e| (e.criterion_text.clone(), e.evaluation))
                .collect(),
        }
    }

    /// Rated criteria in `criteria` order, then any ratings for text no longer listed.
    pub fn evaluations(&self, criteria: &[String]) -> Vec<NewEvaluation> {
        let mut out = Vec::with_capacity(self.ratings.len());
        for criterion in criteria {
            if let Some(&evaluation) = self.ratings.get(criterion) {
                out.push(NewEvaluation {
                    criterion_text: criterion.clone(),
                    evaluation,
                });
            }
        }
        for (text, &evaluation) in &self.ratings {
            if !criteria.contains(text) {
                out.push(NewEvaluation {
                    criterion_text: text.clone(),
                    evaluation,
                });
            }
        }
        out
    }

    pub fn fill_unrated(&mut self, criteria: &[String]) -> usize {
        let mut filled = 0;
        for criterion in criteria {
            if !self.ratings.contains_key(criterion) {
                self.ratings.insert(criterion.clone(), DEFAULT_RATING);
                filled += 1;
            }
        }
        filled
    }
}

/// Navigation badge data for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub index: usize,
    pub sub_competency_id: SubCompetencyId,
    pub title: String,
    pub rated: usize,
    pub criteria: usize,
    pub worst: Option<Rating>,
}

/// Owned snapshot of a step, safe to move into a background write.
#[derive(Debug, Clone)]
struct StepWrite {
    sub_competency_id: SubCompetencyId,
    level: LevelKey,
    notes: Option<String>,
    evaluations: Vec<NewEvaluation>,
}

impl StepWrite {
    async fn persist<S>(self, store: &S, assessment_id: AssessmentId) -> Result<(), StoreError>
    where
        S: AssessmentStore + ?Sized,
    {
        let progress_id = store
            .upsert_progress(
                assessment_id,
                self.sub_competency_id,
                self.level,
                self.notes,
            )
            .await?;
        store
            .replace_evaluations(progress_id, self.evaluations)
            .await
    }
}

/// A spawned step write and the signal that stops it while it is still waiting
/// out the debounce.
struct PendingSave {
    handle: JoinHandle<()>,
    cancel: oneshot::Sender<()>,
}

/// One open assessment wizard. Owns its debounce timer and draft state; nothing
/// is shared between sessions. Edits schedule a debounced write, navigation
/// flushes immediately. Must be driven from inside a Tokio runtime.
///
/// Dropping a session without [`DraftSession::close`] leaves an already scheduled
/// debounced write running.
pub struct DraftSession<S>
where
    S: AssessmentStore + 'static,
{
    store: Arc<S>,
    catalog: Arc<Catalog>,
    subject: Subject,
    assessment_id: AssessmentId,
    status: AssessmentStatus,
    plan: StepPlan,
    step: WizardStep,
    drafts: BTreeMap<SubCompetencyId, StepDraft>,
    config: SessionConfig,
    pending: Option<PendingSave>,
    // serializes writes for this session's keys
    write_gate: Arc<Mutex<()>>,
}

impl<S> DraftSession<S>
where
    S: AssessmentStore + 'static,
{
    /// Resumes `existing` when given, otherwise creates a new draft seeded from
    /// the subject's latest completed assessment.
    pub async fn open(
        store: Arc<S>,
        catalog: Arc<Catalog>,
        subject: Subject,
        existing: Option<AssessmentId>,
        config: SessionConfig,
    ) -> Result<Self, EngineError> {
        let plan = StepPlan::from_catalog(&catalog);
        let (assessment_id, status, step, drafts) = match existing {
            Some(id) => resume(store.as_ref(), &plan, &subject, id).await?,
            None => create(store.as_ref(), &plan, &subject).await?,
        };

        Ok(Self {
            store,
            catalog,
            subject,
            assessment_id,
            status,
            plan,
            step,
            drafts,
            config,
            pending: None,
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == AssessmentStatus::Completed
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn plan(&self) -> &StepPlan {
        &self.plan
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self, id: SubCompetencyId) -> Option<&StepDraft> {
        self.drafts.get(&id)
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    pub fn active_sub_competency(&self) -> Option<&SubCompetency> {
        let id = self.plan.sub_competency_at(self.step)?;
        self.catalog.sub_competency(id)
    }

    /// Criteria shown for the active step at the step's selected level.
    pub fn active_criteria(&self) -> &[String] {
        match self.plan.sub_competency_at(self.step) {
            Some(id) => self.criteria_for(id),
            None => &[],
        }
    }

    pub fn level_for(&self, id: SubCompetencyId) -> LevelKey {
        self.drafts
            .get(&id)
            .map(|d| d.level)
            .unwrap_or(self.subject.current_level)
    }

    fn criteria_for(&self, id: SubCompetencyId) -> &[String] {
        match self.catalog.sub_competency(id) {
            Some(sub) => criteria_for_level_with_fallback(sub, self.level_for(id)),
            None => &[],
        }
    }

    /// Worst rating recorded so far for a step.
    pub fn rating_indicator(&self, id: SubCompetencyId) -> Option<Rating> {
        let draft = self.drafts.get(&id)?;
        worst_rating(draft.evaluations(self.criteria_for(id)).iter().map(|e| e.evaluation))
    }

    pub fn step_overview(&self) -> Vec<StepStatus> {
        self.plan
            .sub_competencies()
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let sub = self.catalog.sub_competency(*id)?;
                let criteria = self.criteria_for(*id);
                let rated = self
                    .drafts
                    .get(id)
                    .map(|d| criteria.iter().filter(|c| d.ratings.contains_key(*c)).count())
                    .unwrap_or(0);
                Some(StepStatus {
                    index,
                    sub_competency_id: *id,
                    title: sub.title.clone(),
                    rated,
                    criteria: criteria.len(),
                    worst: self.rating_indicator(*id),
                })
            })
            .collect()
    }

    pub fn set_rating(&mut self, criterion_index: usize, rating: Rating) -> Result<(), EngineError> {
        self.ensure_editable()?;
        let id = self.active_id()?;
        let criterion = {
            let criteria = self.criteria_for(id);
            criteria
                .get(criterion_index)
                .cloned()
                .ok_or(EngineError::CriterionOutOfRange {
                    index: criterion_index,
                    count: criteria.len(),
                })?
        };
        self.draft_mut(id).ratings.insert(criterion, rating);
        self.schedule_save(id);
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), EngineError> {
        self.ensure_editable()?;
        let notes = notes.into();
        validate_notes(&notes)?;
        let id = self.active_id()?;
        self.draft_mut(id).notes = notes;
        self.schedule_save(id);
        Ok(())
    }

    /// Switches the assessed level of the active step. Ratings for criteria that
    /// do not exist at the new level are discarded.
    pub fn set_level(&mut self, level: LevelKey) -> Result<(), EngineError> {
        self.ensure_editable()?;
        let id = self.active_id()?;
        let catalog = Arc::clone(&self.catalog);
        let sub = catalog
            .sub_competency(id)
            .ok_or(EngineError::SubCompetencyNotFound(id))?;
        let criteria = criteria_for_level_with_fallback(sub, level);

        let draft = self.draft_mut(id);
        draft.level = level;
        draft.ratings.retain(|text, _| criteria.contains(text));
        self.schedule_save(id);
        Ok(())
    }

    /// Stops a scheduled debounced write. A write that has already started runs
    /// to completion; the next flush waits for it on the write gate.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.cancel.send(());
        }
    }

    /// Cancels the debounce and writes the active step now. Steps with no draft
    /// state are skipped. Failures are logged and swallowed; the next edit or
    /// navigation writes the step again.
    pub async fn flush(&mut self) {
        self.cancel();
        if self.is_completed() {
            return;
        }
        let Some(id) = self.plan.sub_competency_at(self.step) else {
            return;
        };
        // untouched steps have nothing to save
        let Some(write) = self.snapshot(id) else {
            return;
        };

        let _guard = self.write_gate.lock().await;
        if let Err(err) = write.persist(self.store.as_ref(), self.assessment_id).await {
            warn!(
                assessment_id = %self.assessment_id,
                sub_competency_id = %id,
                error = %err,
                "autosave flush failed"
            );
        }
    }

    /// Fills unrated criteria of the step being left with the default rating,
    /// then flushes and advances.
    pub async fn next(&mut self) -> Result<WizardStep, EngineError> {
        let target = self.plan.index_of(self.step) + 1;
        let step = self.plan.step(target).ok_or(EngineError::StepOutOfRange {
            step: target,
            last: self.plan.len(),
        })?;

        if !self.is_completed() {
            if let Some(id) = self.plan.sub_competency_at(self.step) {
                let catalog = Arc::clone(&self.catalog);
                let level = self.level_for(id);
                let criteria = catalog
                    .sub_competency(id)
                    .map(|sub| criteria_for_level_with_fallback(sub, level))
                    .unwrap_or(&[]);
                let filled = self.draft_mut(id).fill_unrated(criteria);
                if filled > 0 {
                    debug!(sub_competency_id = %id, filled, "unrated criteria set to target");
                }
            }
        }

        self.move_to(step).await
    }

    pub async fn back(&mut self) -> Result<WizardStep, EngineError> {
        let index = self.plan.index_of(self.step);
        let target = index.checked_sub(1).ok_or(EngineError::NoPreviousStep)?;
        let step = self.plan.step(target).ok_or(EngineError::StepOutOfRange {
            step: target,
            last: self.plan.len(),
        })?;
        self.move_to(step).await
    }

    pub async fn go_to(&mut self, index: usize) -> Result<WizardStep, EngineError> {
        let step = self.plan.step(index).ok_or(EngineError::StepOutOfRange {
            step: index,
            last: self.plan.len(),
        })?;
        self.move_to(step).await
    }

    async fn move_to(&mut self, step: WizardStep) -> Result<WizardStep, EngineError> {
        self.flush().await;
        debug!(
            assessment_id = %self.assessment_id,
            from = self.plan.index_of(self.step),
            to = self.plan.index_of(step),
            "wizard step changed"
        );
        self.step = step;
        Ok(step)
    }

    /// Flushes the active step and completes the assessment. The overall score
    /// is coverage: sub-competencies with a progress row over all of them, x100.
    pub async fn complete(&mut self, notes: Option<String>) -> Result<f64, EngineError> {
        self.ensure_editable()?;
        if let Some(notes) = &notes {
            validate_notes(notes)?;
        }
        self.flush().await;

        let progress = self
            .store
            .list_progress_for_assessment(self.assessment_id)
            .await?;
        let covered = self
            .plan
            .sub_competencies()
            .iter()
            .filter(|id| progress.iter().any(|p| p.sub_competency_id == **id))
            .count();
        let overall_score = if self.plan.is_empty() {
            0.0
        } else {
            covered as f64 / self.plan.len() as f64 * 100.0
        };

        self.store
            .complete_assessment(self.assessment_id, overall_score, notes)
            .await?;
        self.status = AssessmentStatus::Completed;
        self.step = WizardStep::Summary;
        info!(
            assessment_id = %self.assessment_id,
            subject_id = %self.subject.id,
            covered,
            total = self.plan.len(),
            overall_score,
            "assessment completed"
        );
        Ok(overall_score)
    }

    /// Best-effort flush of the active step on close. The write runs in the
    /// background and is not awaited.
    pub fn close(mut self) {
        self.cancel();
        if self.is_completed() {
            return;
        }
        let Some(id) = self.plan.sub_competency_at(self.step) else {
            return;
        };
        if let Some(write) = self.snapshot(id) {
            drop(self.spawn_write(write, None));
        }
    }

    pub async fn discussion_prompts<G>(
        &self,
        generator: &G,
        role_id: Option<&str>,
    ) -> Result<Vec<(usize, SubCompetencyPrompts)>, EngineError>
    where
        G: PromptGenerator + ?Sized,
    {
        let generated = generator
            .generate_discussion_prompts(self.subject.id, self.assessment_id, role_id)
            .await?;
        Ok(align_prompts(&self.plan, generated))
    }

    fn ensure_editable(&self) -> Result<(), EngineError> {
        if self.is_completed() {
            return Err(EngineError::AssessmentCompleted(self.assessment_id));
        }
        Ok(())
    }

    fn active_id(&self) -> Result<SubCompetencyId, EngineError> {
        self.plan
            .sub_competency_at(self.step)
            .ok_or(EngineError::StepOutOfRange {
                step: self.plan.index_of(self.step),
                last: self.plan.len().saturating_sub(1),
            })
    }

    fn draft_mut(&mut self, id: SubCompetencyId) -> &mut StepDraft {
        let level = self.subject.current_level;
        self.drafts
            .entry(id)
            .or_insert_with(|| StepDraft::new(level))
    }

    fn snapshot(&self, id: SubCompetencyId) -> Option<StepWrite> {
        let draft = self.drafts.get(&id)?;
        let notes = draft.notes.trim();
        Some(StepWrite {
            sub_competency_id: id,
            level: draft.level,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            evaluations: draft.evaluations(self.criteria_for(id)),
        })
    }

    fn schedule_save(&mut self, id: SubCompetencyId) {
        self.cancel();
        if let Some(write) = self.snapshot(id) {
            let delay = self.config.debounce();
            self.pending = Some(self.spawn_write(write, Some(delay)));
        }
    }

    /// Dropping the returned handle without cancelling lets the write run.
    fn spawn_write(&self, write: StepWrite, delay: Option<Duration>) -> PendingSave {
        let store = Arc::clone(&self.store);
        let gate = Arc::clone(&self.write_gate);
        let assessment_id = self.assessment_id;
        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    Ok(()) = &mut cancelled => return,
                }
            }
            let _guard = gate.lock().await;
            // cancelled while queued behind a flush
            if cancelled.try_recv().is_ok() {
                return;
            }
            let id = write.sub_competency_id;
            if let Err(err) = write.persist(store.as_ref(), assessment_id).await {
                warn!(
                    assessment_id = %assessment_id,
                    sub_competency_id = %id,
                    error = %err,
                    "background autosave failed"
                );
            }
        });
        PendingSave { handle, cancel }
    }
}

type Opened = (
    AssessmentId,
    AssessmentStatus,
    WizardStep,
    BTreeMap<SubCompetencyId, StepDraft>,
);

async fn create<S>(store: &S, plan: &StepPlan, subject: &Subject) -> Result<Opened, EngineError>
where
    S: AssessmentStore + ?Sized,
{
    let previous = latest_completed_record(store, subject.id).await?;
    let assessment_id = store.create_draft_assessment(subject.id).await?;

    let mut drafts = BTreeMap::new();
    if let Some(previous) = &previous {
        for row in &previous.progress {
            let draft = StepDraft::from_record(row);
            let write = StepWrite {
                sub_competency_id: row.progress.sub_competency_id,
                level: row.progress.current_level,
                notes: row.progress.notes.clone(),
                evaluations: row
                    .evaluations
                    .iter()
                    .map(|e| NewEvaluation {
                        criterion_text: e.criterion_text.clone(),
                        evaluation: e.evaluation,
                    })
                    .collect(),
            };
            write.persist(store, assessment_id).await?;
            drafts.insert(row.progress.sub_competency_id, draft);
        }
        info!(
            assessment_id = %assessment_id,
            previous_id = %previous.assessment.id,
            copied = drafts.len(),
            "draft seeded from previous assessment"
        );
    } else {
        info!(assessment_id = %assessment_id, subject_id = %subject.id, "draft created");
    }

    let step = plan.step(0).unwrap_or(WizardStep::Summary);
    Ok((assessment_id, AssessmentStatus::Draft, step, drafts))
}

async fn resume<S>(
    store: &S,
    plan: &StepPlan,
    subject: &Subject,
    id: AssessmentId,
) -> Result<Opened, EngineError>
where
    S: AssessmentStore + ?Sized,
{
    let record = load_assessment_record(store, id).await?;
    if record.assessment.subject_id != subject.id {
        return Err(EngineError::AssessmentNotFound(id));
    }

    let drafts = record
        .progress
        .iter()
        .map(|row| (row.progress.sub_competency_id, StepDraft::from_record(row)))
        .collect();
    let step = if record.assessment.is_completed() {
        WizardStep::Summary
    } else {
        plan.resume_step(&record)
    };
    debug!(assessment_id = %id, step = plan.index_of(step), "draft resumed");
    Ok((id, record.assessment.status, step, drafts))
}

#[cfg(test)]
#[path = "../../tests/src_inline/draft/session.rs"]
mod tests;
