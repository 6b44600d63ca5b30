use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::draft::steps::StepPlan;
use crate::error::EngineError;
use crate::model::{AssessmentId, SubCompetencyId, SubjectId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionPrompt {
    pub question: String,
    pub look_for: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCompetencyPrompts {
    pub sub_competency_id: SubCompetencyId,
    pub prompts: Vec<DiscussionPrompt>,
}

/// Drafts interview / review questions for an assessment. Backed by an external
/// text-generation service.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    async fn generate_discussion_prompts(
        &self,
        subject_id: SubjectId,
        assessment_id: AssessmentId,
        role_id: Option<&str>,
    ) -> Result<Vec<SubCompetencyPrompts>, EngineError>;
}

/// Reorders generated prompts into wizard step order. Prompts for
/// sub-competencies outside the plan are dropped; duplicates are merged.
pub fn align_prompts(
    plan: &StepPlan,
    generated: Vec<SubCompetencyPrompts>,
) -> Vec<(usize, SubCompetencyPrompts)> {
    let mut out: Vec<(usize, SubCompetencyPrompts)> = Vec::new();
    for entry in generated {
        let Some(step) = plan.position(entry.sub_competency_id) else {
            continue;
        };
        match out.iter_mut().find(|(s, _)| *s == step) {
            Some((_, existing)) => existing.prompts.extend(entry.prompts),
            None => out.push((step, entry)),
        }
    }
    out.sort_by_key(|(step, _)| *step);
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/draft/prompts.rs"]
mod tests;
