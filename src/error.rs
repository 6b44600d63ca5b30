use thiserror::Error;

use crate::model::{AssessmentId, SubCompetencyId, SubjectId};

/// Input rule violations. Raised before any store call so nothing is half written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must not contain empty entries")]
    Empty { field: &'static str },
    #[error("code {code} is used more than once")]
    DuplicateCode { code: String },
    #[error("{entity} id {id} is used more than once")]
    DuplicateId { entity: &'static str, id: u64 },
    #[error("sub-competency {code} does not belong to competency {competency}")]
    WrongParent { code: String, competency: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("store backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("subject {0} not found")]
    SubjectNotFound(SubjectId),
    #[error("sub-competency {0} not found")]
    SubCompetencyNotFound(SubCompetencyId),
    #[error("assessment {0} not found")]
    AssessmentNotFound(AssessmentId),
    #[error("assessment {0} is completed and can no longer be edited")]
    AssessmentCompleted(AssessmentId),
    #[error("step {step} is out of range (last step is {last})")]
    StepOutOfRange { step: usize, last: usize },
    #[error("already at the first step")]
    NoPreviousStep,
    #[error("criterion index {index} is out of range ({count} criteria at this level)")]
    CriterionOutOfRange { index: usize, count: usize },
    #[error("trend needs at least two completed assessments, got {0}")]
    NotEnoughAssessments(usize),
    #[error("prompt generator failed: {0}")]
    PromptGenerator(String),
}
