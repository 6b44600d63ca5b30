use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::draft::{AssessmentStore, MemoryStore};
use crate::error::{EngineError, ValidationError};
use crate::model::catalog::validate_notes;
use crate::model::{Catalog, Competency, LevelKey, NewEvaluation, RoleType, SubCompetencyId, Subject};
use crate::scoring::ScoringProfile;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid catalog: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Snapshot of a team's framework and assessment history.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub role_type: RoleType,
    pub competencies: Vec<Competency>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub assessments: Vec<HistoricalAssessment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalAssessment {
    pub subject_id: crate::model::SubjectId,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub progress: Vec<HistoricalProgress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalProgress {
    pub sub_competency_id: SubCompetencyId,
    pub current_level: LevelKey,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub evaluations: Vec<NewEvaluation>,
}

pub struct LoadedDataset {
    pub catalog: Catalog,
    pub subjects: Vec<Subject>,
    pub store: MemoryStore,
}

fn read_json<T>(path: &Path) -> Result<T, InputError>
where
    T: for<'de> Deserialize<'de>,
{
    let raw = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_dataset(path: &Path) -> Result<Dataset, InputError> {
    read_json(path)
}

/// Missing fields keep their `default_v1` values.
pub fn load_profile(path: &Path) -> Result<ScoringProfile, InputError> {
    read_json(path)
}

/// Validates the catalog and replays the history into a fresh in-memory store.
/// Every reference is checked before the first write.
pub async fn seed_store(dataset: Dataset) -> Result<LoadedDataset, InputError> {
    let catalog = Catalog::new(dataset.role_type, dataset.competencies)?;

    for historical in &dataset.assessments {
        if !dataset.subjects.iter().any(|s| s.id == historical.subject_id) {
            return Err(EngineError::SubjectNotFound(historical.subject_id).into());
        }
        if let Some(notes) = &historical.notes {
            validate_notes(notes)?;
        }
        for row in &historical.progress {
            if catalog.sub_competency(row.sub_competency_id).is_none() {
                return Err(EngineError::SubCompetencyNotFound(row.sub_competency_id).into());
            }
            if let Some(notes) = &row.notes {
                validate_notes(notes)?;
            }
        }
    }

    let store = MemoryStore::new();
    let total = catalog.sub_competency_count();
    for historical in dataset.assessments {
        let id = store
            .create_draft_assessment(historical.subject_id)
            .await
            .map_err(EngineError::from)?;
        let covered = historical
            .progress
            .iter()
            .map(|p| p.sub_competency_id)
            .collect::<BTreeSet<_>>()
            .len();
        for row in historical.progress {
            let progress_id = store
                .upsert_progress(id, row.sub_competency_id, row.current_level, row.notes)
                .await
                .map_err(EngineError::from)?;
            store
                .replace_evaluations(progress_id, row.evaluations)
                .await
                .map_err(EngineError::from)?;
        }
        let overall = historical.overall_score.unwrap_or_else(|| {
            if total == 0 {
                0.0
            } else {
                covered.min(total) as f64 / total as f64 * 100.0
            }
        });
        store
            .complete_assessment_at(id, overall, historical.notes, historical.completed_at)
            .await
            .map_err(EngineError::from)?;
    }

    info!(
        competencies = catalog.competencies().len(),
        sub_competencies = total,
        subjects = dataset.subjects.len(),
        "dataset loaded"
    );

    Ok(LoadedDataset {
        catalog,
        subjects: dataset.subjects,
        store,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
