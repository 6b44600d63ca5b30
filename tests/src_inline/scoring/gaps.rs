use super::*;
use crate::fixtures::{
    CODE_QUALITY, COLLAB, CRAFT, SYSTEM_DESIGN, record, sample_catalog, subject,
};
use crate::model::{LevelKey, Rating};
use crate::scoring::team::{TeamMember, team_radar};

#[test]
fn test_priority_thresholds() {
    let profile = ScoringProfile::default_v1();
    assert_eq!(classify_priority(0.0, 0, &profile), GapPriority::NotAssessed);
    assert_eq!(classify_priority(9.0, 0, &profile), GapPriority::NotAssessed);
    assert_eq!(classify_priority(3.99, 1, &profile), GapPriority::High);
    assert_eq!(classify_priority(4.0, 1, &profile), GapPriority::Medium);
    assert_eq!(classify_priority(5.99, 2, &profile), GapPriority::Medium);
    assert_eq!(classify_priority(6.0, 2, &profile), GapPriority::Strength);
}

#[test]
fn test_gaps_sorted_with_skill_hints() {
    let catalog = sample_catalog();
    let profile = ScoringProfile::default_v1();
    let member = subject(1, LevelKey::P2Developing);
    let member_record = record(
        1,
        1,
        3,
        &[(
            CODE_QUALITY,
            LevelKey::P2Developing,
            &[("Writes readable code", Rating::Below)],
        )],
    );
    let members = [TeamMember {
        subject: &member,
        record: &member_record,
    }];
    let radar = team_radar(&catalog, &members, &profile);
    let gaps = hiring_gaps(&catalog, &radar, &profile);

    assert_eq!(gaps.len(), 2);
    assert_eq!(gaps[0].competency_id, COLLAB);
    assert_eq!(gaps[0].priority, GapPriority::NotAssessed);

    let craft = &gaps[1];
    assert_eq!(craft.competency_id, CRAFT);
    assert_eq!(craft.priority, GapPriority::High);
    let hints = craft
        .skills_to_look_for
        .iter()
        .map(|h| h.sub_competency_id)
        .collect::<Vec<_>>();
    assert_eq!(hints, vec![SYSTEM_DESIGN, CODE_QUALITY]);
}

#[test]
fn test_skill_hints_truncated() {
    let catalog = sample_catalog();
    let profile = ScoringProfile {
        skills_to_look_for: 1,
        ..ScoringProfile::default_v1()
    };
    let radar = team_radar(&catalog, &[], &profile);
    let gaps = hiring_gaps(&catalog, &radar, &profile);
    assert!(gaps.iter().all(|g| g.skills_to_look_for.len() == 1));
    assert!(gaps.iter().all(|g| g.priority == GapPriority::NotAssessed));
}

#[test]
fn test_priority_display_order() {
    assert!(GapPriority::NotAssessed < GapPriority::High);
    assert!(GapPriority::High < GapPriority::Medium);
    assert!(GapPriority::Medium < GapPriority::Strength);
    assert_eq!(GapPriority::NotAssessed.as_str(), "not_assessed");
}
