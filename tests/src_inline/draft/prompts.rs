use super::*;
use crate::fixtures::{CODE_QUALITY, COMMUNICATION, MENTORING, sample_catalog};

fn prompts(id: SubCompetencyId, questions: &[&str]) -> SubCompetencyPrompts {
    SubCompetencyPrompts {
        sub_competency_id: id,
        prompts: questions
            .iter()
            .map(|q| DiscussionPrompt {
                question: q.to_string(),
                look_for: "specific examples".to_string(),
            })
            .collect(),
    }
}

#[test]
fn test_align_prompts_to_step_order() {
    let plan = StepPlan::from_catalog(&sample_catalog());
    let aligned = align_prompts(
        &plan,
        vec![
            prompts(MENTORING, &["Who have you mentored?"]),
            prompts(SubCompetencyId(999), &["Unknown"]),
            prompts(CODE_QUALITY, &["How do you review code?"]),
            prompts(COMMUNICATION, &["How do you share status?"]),
            prompts(CODE_QUALITY, &["What makes a test useful?"]),
        ],
    );

    let steps = aligned.iter().map(|(step, _)| *step).collect::<Vec<_>>();
    assert_eq!(steps, vec![0, 2, 3]);
    assert_eq!(aligned[0].1.prompts.len(), 2);
    assert_eq!(aligned[0].1.prompts[1].question, "What makes a test useful?");
}

#[test]
fn test_align_prompts_empty() {
    let plan = StepPlan::from_catalog(&sample_catalog());
    assert!(align_prompts(&plan, Vec::new()).is_empty());
}
