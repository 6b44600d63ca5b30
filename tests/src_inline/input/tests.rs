use std::fs;

use super::*;
use crate::model::{SubjectId, SubjectKind};

const DATASET: &str = r#"{
  "role_type": "ic",
  "competencies": [
    {
      "id": 2,
      "title": "Collaboration",
      "code": "COL",
      "order_index": 1,
      "sub_competencies": [
        {
          "id": 21,
          "competency_id": 2,
          "title": "Communication",
          "code": "COL-COM",
          "level_criteria": [
            { "level": "p2_developing", "criteria": ["Shares status proactively"] }
          ]
        }
      ]
    },
    {
      "id": 1,
      "title": "Engineering Craft",
      "code": "ENG",
      "order_index": 0,
      "sub_competencies": [
        {
          "id": 12,
          "competency_id": 1,
          "title": "System Design",
          "code": "ENG-SD",
          "legacy_criteria": { "intermediate": ["C", "D"] }
        }
      ]
    }
  ],
  "subjects": [
    { "id": 1, "name": "Ada", "current_level": "p2_developing" },
    { "id": 2, "name": "Grace", "current_level": "p3_career", "kind": "candidate" }
  ],
  "assessments": [
    {
      "subject_id": 1,
      "completed_at": "2025-01-02T09:00:00Z",
      "progress": [
        {
          "sub_competency_id": 12,
          "current_level": "p2_developing",
          "evaluations": [
            { "criterion_text": "C", "evaluation": "below" },
            { "criterion_text": "D", "evaluation": "target" }
          ]
        }
      ]
    },
    {
      "subject_id": 1,
      "completed_at": "2025-02-02T09:00:00Z",
      "overall_score": 100.0,
      "notes": "strong quarter",
      "progress": []
    }
  ]
}"#;

fn write_dataset(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("dataset.json");
    fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_load_and_seed_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), DATASET);

    let dataset = load_dataset(&path).unwrap();
    assert_eq!(dataset.subjects[1].kind, SubjectKind::Candidate);
    assert_eq!(dataset.assessments.len(), 2);

    let loaded = seed_store(dataset).await.unwrap();
    assert_eq!(loaded.catalog.competencies()[0].code, "ENG");
    assert_eq!(loaded.catalog.sub_competency_count(), 2);

    let completed = loaded
        .store
        .list_completed_assessments(SubjectId(1))
        .await
        .unwrap();
    assert_eq!(completed.len(), 2);
    assert_eq!(completed[0].overall_score, Some(50.0));
    assert_eq!(completed[1].overall_score, Some(100.0));
    assert_eq!(completed[1].notes.as_deref(), Some("strong quarter"));

    let record = crate::draft::load_assessment_record(&loaded.store, completed[0].id)
        .await
        .unwrap();
    assert_eq!(record.evaluations_for(SubCompetencyId(12)).len(), 2);
}

#[tokio::test]
async fn test_unknown_references_rejected_before_writes() {
    let unknown_subject = DATASET.replace(r#""subject_id": 1,"#, r#""subject_id": 9,"#);
    let dataset: Dataset = serde_json::from_str(&unknown_subject).unwrap();
    let err = seed_store(dataset).await.err().unwrap();
    assert!(matches!(
        err,
        InputError::Engine(EngineError::SubjectNotFound(SubjectId(9)))
    ));

    let unknown_sub = DATASET.replace(r#""sub_competency_id": 12"#, r#""sub_competency_id": 99"#);
    let dataset: Dataset = serde_json::from_str(&unknown_sub).unwrap();
    let err = seed_store(dataset).await.err().unwrap();
    assert!(matches!(
        err,
        InputError::Engine(EngineError::SubCompetencyNotFound(SubCompetencyId(99)))
    ));
}

#[tokio::test]
async fn test_invalid_catalog_rejected() {
    let duplicated = DATASET.replace("\"COL-COM\"", "\"ENG-SD\"");
    let dataset: Dataset = serde_json::from_str(&duplicated).unwrap();
    let err = seed_store(dataset).await.err().unwrap();
    assert!(matches!(
        err,
        InputError::Validation(ValidationError::DuplicateCode { .. })
    ));
}

#[test]
fn test_read_errors_carry_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = load_dataset(&missing).unwrap_err();
    assert!(matches!(err, InputError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));

    let broken = write_dataset(dir.path(), "{ not json");
    assert!(matches!(
        load_dataset(&broken).unwrap_err(),
        InputError::Parse { .. }
    ));
}

#[test]
fn test_profile_overrides_keep_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    fs::write(&path, r#"{ "trend_threshold": 0.5, "skills_to_look_for": 5 }"#).unwrap();

    let profile = load_profile(&path).unwrap();
    assert_eq!(profile.trend_threshold, 0.5);
    assert_eq!(profile.skills_to_look_for, 5);
    assert_eq!(profile.level_up_min, ScoringProfile::default_v1().level_up_min);
}
