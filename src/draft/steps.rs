use serde::Serialize;

use crate::model::{AssessmentRecord, Catalog, SubCompetencyId};

/// Wizard position: one step per sub-competency, then the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum WizardStep {
    SubCompetency(usize),
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    sub_competencies: Vec<SubCompetencyId>,
}

impl StepPlan {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            sub_competencies: catalog.ordered_sub_competencies().map(|s| s.id).collect(),
        }
    }

    /// Number of sub-competency steps; the summary sits at this index.
    pub fn len(&self) -> usize {
        self.sub_competencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_competencies.is_empty()
    }

    pub fn sub_competencies(&self) -> &[SubCompetencyId] {
        &self.sub_competencies
    }

    /// `0..len` maps to sub-competency steps, `len` to the summary.
    pub fn step(&self, index: usize) -> Option<WizardStep> {
        if index < self.len() {
            Some(WizardStep::SubCompetency(index))
        } else if index == self.len() {
            Some(WizardStep::Summary)
        } else {
            None
        }
    }

    pub fn index_of(&self, step: WizardStep) -> usize {
        match step {
            WizardStep::SubCompetency(index) => index,
            WizardStep::Summary => self.len(),
        }
    }

    pub fn sub_competency_at(&self, step: WizardStep) -> Option<SubCompetencyId> {
        match step {
            WizardStep::SubCompetency(index) => self.sub_competencies.get(index).copied(),
            WizardStep::Summary => None,
        }
    }

    pub fn position(&self, id: SubCompetencyId) -> Option<usize> {
        self.sub_competencies.iter().position(|s| *s == id)
    }

    /// First step with no recorded evaluations, or the summary when all have some.
    pub fn resume_step(&self, record: &AssessmentRecord) -> WizardStep {
        self.sub_competencies
            .iter()
            .position(|id| !record.has_evaluations(*id))
            .map(WizardStep::SubCompetency)
            .unwrap_or(WizardStep::Summary)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/draft/steps.rs"]
mod tests;
