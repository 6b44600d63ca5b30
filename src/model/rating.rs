use serde::{Deserialize, Serialize};

/// Five-point outcome for a single criterion, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    WellBelow,
    Below,
    Target,
    Above,
    WellAbove,
}

/// Filled in for criteria still unrated when the wizard moves forward.
pub const DEFAULT_RATING: Rating = Rating::Target;

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::WellBelow,
        Rating::Below,
        Rating::Target,
        Rating::Above,
        Rating::WellAbove,
    ];

    pub fn score(self) -> u8 {
        match self {
            Rating::WellBelow => 1,
            Rating::Below => 2,
            Rating::Target => 3,
            Rating::Above => 4,
            Rating::WellAbove => 5,
        }
    }

    /// Offset from the level's base score used by the team-relative formula.
    /// Asymmetric: above-target outcomes move further than below-target ones.
    pub fn modifier(self) -> i8 {
        match self {
            Rating::WellBelow => -2,
            Rating::Below => -1,
            Rating::Target => 0,
            Rating::Above => 2,
            Rating::WellAbove => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::WellBelow => "well_below",
            Rating::Below => "below",
            Rating::Target => "target",
            Rating::Above => "above",
            Rating::WellAbove => "well_above",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::WellBelow => "Well below",
            Rating::Below => "Below",
            Rating::Target => "On target",
            Rating::Above => "Above",
            Rating::WellAbove => "Well above",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }

    pub fn is_below_target(self) -> bool {
        self < Rating::Target
    }

    pub fn is_above_target(self) -> bool {
        self > Rating::Target
    }
}

/// Lowest-scored rating of the set; on ties the first one seen wins.
pub fn worst_rating<I>(ratings: I) -> Option<Rating>
where
    I: IntoIterator<Item = Rating>,
{
    let mut worst: Option<Rating> = None;
    for rating in ratings {
        match worst {
            Some(current) if rating.score() >= current.score() => {}
            _ => worst = Some(rating),
        }
    }
    worst
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/rating.rs"]
mod tests;
