use super::*;

#[test]
fn test_scores_strictly_monotonic() {
    let scores = Rating::ALL.iter().map(|r| r.score()).collect::<Vec<_>>();
    assert_eq!(scores, vec![1, 2, 3, 4, 5]);
    let modifiers = Rating::ALL.iter().map(|r| r.modifier()).collect::<Vec<_>>();
    assert_eq!(modifiers, vec![-2, -1, 0, 2, 4]);
}

#[test]
fn test_worst_rating() {
    assert_eq!(worst_rating(Vec::<Rating>::new()), None);
    assert_eq!(
        worst_rating([Rating::Above, Rating::Below, Rating::Target]),
        Some(Rating::Below)
    );
    assert_eq!(
        worst_rating([Rating::WellAbove, Rating::WellBelow, Rating::WellBelow]),
        Some(Rating::WellBelow)
    );
}

#[test]
fn test_default_is_target() {
    assert_eq!(DEFAULT_RATING, Rating::Target);
    assert!(!DEFAULT_RATING.is_below_target());
    assert!(!DEFAULT_RATING.is_above_target());
}

#[test]
fn test_wire_names() {
    assert_eq!(
        serde_json::to_string(&Rating::WellBelow).unwrap(),
        "\"well_below\""
    );
    assert_eq!(Rating::parse("well_above"), Some(Rating::WellAbove));
    assert_eq!(Rating::parse("excellent"), None);
}
