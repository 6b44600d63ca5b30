use super::*;
use crate::fixtures::{COLLAB, CRAFT, sample_catalog, sample_competencies, sub};
use crate::model::CompetencyId;

#[test]
fn test_catalog_orders_competencies_and_subs() {
    let mut competencies = sample_competencies();
    competencies.reverse();
    competencies[1].sub_competencies.reverse();
    let catalog = Catalog::new(RoleType::Ic, competencies).unwrap();

    let titles = catalog
        .ordered_sub_competencies()
        .map(|s| s.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec!["Code Quality", "System Design", "Communication", "Mentoring"]
    );
    assert_eq!(catalog.competencies()[0].id, CRAFT);
    assert_eq!(catalog.sub_competency_count(), 4);
    assert_eq!(catalog.levels().len(), 5);
}

#[test]
fn test_duplicate_codes_rejected() {
    let mut competencies = sample_competencies();
    competencies[1].sub_competencies[0].code = "ENG-CQ".to_string();
    let err = Catalog::new(RoleType::Ic, competencies).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DuplicateCode {
            code: "ENG-CQ".to_string()
        }
    );
}

#[test]
fn test_sub_under_wrong_parent_rejected() {
    let mut competencies = sample_competencies();
    competencies[0].sub_competencies[0].competency_id = COLLAB;
    let err = Catalog::new(RoleType::Ic, competencies).unwrap_err();
    assert!(matches!(err, ValidationError::WrongParent { .. }));
}

#[test]
fn test_title_rules_report_first_violation() {
    assert_eq!(
        validate_title("competency title", "   "),
        Err(ValidationError::Required {
            field: "competency title"
        })
    );
    let long = "x".repeat(MAX_TITLE_LEN + 1);
    assert_eq!(
        validate_title("competency title", &long),
        Err(ValidationError::TooLong {
            field: "competency title",
            max: MAX_TITLE_LEN
        })
    );
    assert!(validate_title("competency title", &"x".repeat(MAX_TITLE_LEN)).is_ok());
}

#[test]
fn test_criteria_rules() {
    let blank = vec!["ok".to_string(), "  ".to_string()];
    assert_eq!(
        validate_criteria(&blank),
        Err(ValidationError::Empty { field: "criteria" })
    );
    let long = vec!["y".repeat(MAX_CRITERION_LEN + 1)];
    assert!(matches!(
        validate_criteria(&long),
        Err(ValidationError::TooLong { .. })
    ));

    let mut competency = sample_competencies().remove(0);
    competency.sub_competencies[1].legacy_criteria.expert = vec![String::new()];
    assert!(validate_competency(&competency).is_err());
}

#[test]
fn test_notes_limit() {
    assert!(validate_notes(&"n".repeat(MAX_NOTES_LEN)).is_ok());
    assert!(validate_notes(&"n".repeat(MAX_NOTES_LEN + 1)).is_err());
}

#[test]
fn test_lookup_unknown_ids() {
    let catalog = sample_catalog();
    assert!(catalog.competency(CompetencyId(99)).is_none());
    let orphan = sub(crate::model::SubCompetencyId(99), CRAFT, "X", "Orphan", 0);
    assert!(catalog.sub_competency(orphan.id).is_none());
}

#[test]
fn test_duplicate_ids_rejected() {
    let mut competencies = sample_competencies();
    competencies[1].sub_competencies[0].id = crate::model::SubCompetencyId(11);
    assert_eq!(
        Catalog::new(RoleType::Ic, competencies).unwrap_err(),
        ValidationError::DuplicateId {
            entity: "sub-competency",
            id: 11
        }
    );

    let mut competencies = sample_competencies();
    competencies[1].id = CRAFT;
    for sub in &mut competencies[1].sub_competencies {
        sub.competency_id = CRAFT;
    }
    assert_eq!(
        Catalog::new(RoleType::Ic, competencies).unwrap_err(),
        ValidationError::DuplicateId {
            entity: "competency",
            id: 1
        }
    );
}
