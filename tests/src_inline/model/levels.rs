use super::*;

#[test]
fn test_role_ladders_are_ordered() {
    let ic = levels_for_role_type(RoleType::Ic);
    let mgmt = levels_for_role_type(RoleType::Management);
    assert_eq!(ic.len(), 5);
    assert_eq!(mgmt.len(), 4);
    for (i, level) in ic.iter().chain(mgmt.iter()).enumerate() {
        let expected = if i < 5 { i } else { i - 5 };
        assert_eq!(level.index, expected);
    }
    assert_eq!(ic[0].key, LevelKey::P1Entry);
    assert_eq!(mgmt[3].key, LevelKey::M4SeniorDirector);
}

#[test]
fn test_ends_of_ladder_return_none() {
    for role_type in [RoleType::Ic, RoleType::Management] {
        let levels = levels_for_role_type(role_type);
        let first = levels[0].key;
        let last = levels[levels.len() - 1].key;
        assert_eq!(level_above(levels, last), None);
        assert_eq!(level_n_below(levels, first, 1), None);
        assert_eq!(level_n_above(levels, first, levels.len()), None);
        assert_eq!(level_n_below(levels, last, levels.len()), None);
    }
}

#[test]
fn test_offsets_within_ladder() {
    let levels = levels_for_role_type(RoleType::Ic);
    assert_eq!(
        level_above(levels, LevelKey::P2Developing).map(|l| l.key),
        Some(LevelKey::P3Career)
    );
    assert_eq!(
        level_n_above(levels, LevelKey::P1Entry, 4).map(|l| l.key),
        Some(LevelKey::P5Expert)
    );
    assert_eq!(
        level_n_below(levels, LevelKey::P4Advanced, 2).map(|l| l.key),
        Some(LevelKey::P2Developing)
    );
    assert_eq!(
        level_n_above(levels, LevelKey::P3Career, 0).map(|l| l.key),
        Some(LevelKey::P3Career)
    );
    assert_eq!(
        level_offset(levels, LevelKey::P3Career, -1).map(|l| l.key),
        Some(LevelKey::P2Developing)
    );
}

#[test]
fn test_key_from_other_ladder_is_not_found() {
    let levels = levels_for_role_type(RoleType::Ic);
    assert_eq!(level_above(levels, LevelKey::M1TeamLead), None);
}

#[test]
fn test_label_key_bijection() {
    for role_type in [RoleType::Ic, RoleType::Management] {
        for level in levels_for_role_type(role_type) {
            assert_eq!(label_to_key(role_type, key_to_label(level.key)), Some(level.key));
        }
    }
    assert_eq!(label_to_key(RoleType::Ic, " senior "), Some(LevelKey::P3Career));
    assert_eq!(label_to_key(RoleType::Ic, "Director"), None);
}

#[test]
fn test_level_key_strings_round_trip_through_serde() {
    for key in LevelKey::ALL {
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.as_str()));
        assert_eq!(LevelKey::parse(key.as_str()), Some(key));
    }
}

#[test]
fn test_legacy_mapping() {
    assert_eq!(LevelKey::P2Developing.legacy(), Some(LegacyLevel::Intermediate));
    assert_eq!(LevelKey::P5Expert.legacy(), None);
    assert_eq!(LevelKey::M2Manager.legacy(), None);
}
