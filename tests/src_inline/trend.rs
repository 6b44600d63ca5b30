use super::*;
use crate::draft::MemoryStore;
use crate::fixtures::{
    CODE_QUALITY, COLLAB, CRAFT, approx, day, sample_catalog, seed_completed, subject,
};
use crate::model::{LevelKey, Rating};

fn scored(id: u64, on: u32, scores: &[(CompetencyId, f64)]) -> ScoredAssessment {
    ScoredAssessment {
        assessment_id: AssessmentId(id),
        completed_at: Some(day(on)),
        strategy: ScoringStrategy::MemberRelative,
        competency_scores: scores.iter().copied().collect(),
        sub_competency_scores: BTreeMap::new(),
    }
}

#[test]
fn test_threshold_is_strict() {
    assert_eq!(classify_trend(0.30, 0.3), Trend::Stable);
    assert_eq!(classify_trend(-0.30, 0.3), Trend::Stable);
    assert_eq!(classify_trend(0.31, 0.3), Trend::Improving);
    assert_eq!(classify_trend(-0.31, 0.3), Trend::Declining);
    assert_eq!(classify_trend(0.0, 0.3), Trend::Stable);
}

#[test]
fn test_delta_ignores_float_noise_at_threshold() {
    assert_eq!(TrendDelta::between(1.0, 1.3, 0.3).trend, Trend::Stable);
    assert_eq!(TrendDelta::between(2.0, 1.7, 0.3).trend, Trend::Stable);
    assert_eq!(TrendDelta::between(1.0, 1.31, 0.3).trend, Trend::Improving);
    assert_eq!(TrendDelta::between(1.31, 1.0, 0.3).trend, Trend::Declining);
    assert!(approx(TrendDelta::between(1.0, 1.3, 0.3).diff, 0.3));
}

#[test]
fn test_first_to_last_improving() {
    let profile = ScoringProfile::default_v1();
    let report = build_trend_report(
        &[scored(1, 2, &[(CRAFT, 2.0)]), scored(2, 9, &[(CRAFT, 3.5)])],
        &profile,
    )
    .unwrap();

    let delta = report.competencies[&CRAFT];
    assert!(approx(delta.diff, 1.5));
    assert_eq!(delta.trend, Trend::Improving);
    assert_eq!(report.summary.improving, 1);
    assert_eq!(report.overall.map(|d| d.trend), Some(Trend::Improving));
}

#[test]
fn test_unordered_input_sorted_by_completion() {
    let profile = ScoringProfile::default_v1();
    let report = build_trend_report(
        &[
            scored(3, 20, &[(CRAFT, 2.0), (COLLAB, 4.0)]),
            scored(1, 1, &[(CRAFT, 4.0)]),
            scored(2, 10, &[(CRAFT, 3.0), (COLLAB, 4.0)]),
        ],
        &profile,
    )
    .unwrap();

    let series = report
        .series
        .iter()
        .map(|p| p.assessment_id)
        .collect::<Vec<_>>();
    assert_eq!(series, vec![AssessmentId(1), AssessmentId(2), AssessmentId(3)]);
    assert_eq!(report.assessments, 3);
    assert_eq!(report.competencies[&CRAFT].trend, Trend::Declining);
    // first snapshot never scored collaboration
    assert!(!report.competencies.contains_key(&COLLAB));
    assert_eq!(
        report.summary,
        TrendSummary {
            improving: 0,
            stable: 0,
            declining: 1
        }
    );
}

#[test]
fn test_fewer_than_two_assessments() {
    let profile = ScoringProfile::default_v1();
    let err = build_trend_report(&[scored(1, 2, &[(CRAFT, 2.0)])], &profile).unwrap_err();
    assert!(matches!(err, EngineError::NotEnoughAssessments(1)));
    let err = build_trend_report(&[], &profile).unwrap_err();
    assert!(matches!(err, EngineError::NotEnoughAssessments(0)));
}

#[tokio::test]
async fn test_subject_trend_from_store() {
    let store = MemoryStore::new();
    let catalog = sample_catalog();
    let profile = ScoringProfile::default_v1();
    let member = subject(1, LevelKey::P2Developing);

    seed_completed(
        &store,
        1,
        9,
        &[(
            CODE_QUALITY,
            LevelKey::P2Developing,
            &[("Writes readable code", Rating::Above), ("Adds tests for new code", Rating::Target)],
        )],
    )
    .await;
    seed_completed(
        &store,
        1,
        2,
        &[(
            CODE_QUALITY,
            LevelKey::P2Developing,
            &[("Writes readable code", Rating::Below), ("Adds tests for new code", Rating::Below)],
        )],
    )
    .await;
    seed_completed(
        &store,
        2,
        5,
        &[(
            CODE_QUALITY,
            LevelKey::P2Developing,
            &[("Writes readable code", Rating::WellAbove)],
        )],
    )
    .await;

    let report = subject_trend(
        &store,
        &catalog,
        &member,
        ScoringStrategy::MemberRelative,
        &profile,
    )
    .await
    .unwrap();

    assert_eq!(report.assessments, 2);
    let delta = report.sub_competencies[&CODE_QUALITY];
    assert!(approx(delta.first, 2.0));
    assert!(approx(delta.last, 3.5));
    assert_eq!(delta.trend, Trend::Improving);
}

#[tokio::test]
async fn test_subject_trend_needs_history() {
    let store = MemoryStore::new();
    let catalog = sample_catalog();
    let member = subject(1, LevelKey::P2Developing);
    let err = subject_trend(
        &store,
        &catalog,
        &member,
        ScoringStrategy::TeamRelative,
        &ScoringProfile::default_v1(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::NotEnoughAssessments(0)));
}
