use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    Ic,
    Management,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelKey {
    #[serde(rename = "p1_entry")]
    P1Entry,
    #[serde(rename = "p2_developing")]
    P2Developing,
    #[serde(rename = "p3_career")]
    P3Career,
    #[serde(rename = "p4_advanced")]
    P4Advanced,
    #[serde(rename = "p5_expert")]
    P5Expert,
    #[serde(rename = "m1_team_lead")]
    M1TeamLead,
    #[serde(rename = "m2_manager")]
    M2Manager,
    #[serde(rename = "m3_director")]
    M3Director,
    #[serde(rename = "m4_senior_director")]
    M4SeniorDirector,
}

/// Level keys used before per-level criteria existed. Criteria for these live in
/// separate fields on older sub-competency records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub key: LevelKey,
    pub label: &'static str,
    pub index: usize,
}

const IC_LEVELS: &[Level] = &[
    Level {
        key: LevelKey::P1Entry,
        label: "Associate",
        index: 0,
    },
    Level {
        key: LevelKey::P2Developing,
        label: "Mid-Level",
        index: 1,
    },
    Level {
        key: LevelKey::P3Career,
        label: "Senior",
        index: 2,
    },
    Level {
        key: LevelKey::P4Advanced,
        label: "Staff",
        index: 3,
    },
    Level {
        key: LevelKey::P5Expert,
        label: "Principal",
        index: 4,
    },
];

const MANAGEMENT_LEVELS: &[Level] = &[
    Level {
        key: LevelKey::M1TeamLead,
        label: "Team Lead",
        index: 0,
    },
    Level {
        key: LevelKey::M2Manager,
        label: "Manager",
        index: 1,
    },
    Level {
        key: LevelKey::M3Director,
        label: "Director",
        index: 2,
    },
    Level {
        key: LevelKey::M4SeniorDirector,
        label: "Senior Director",
        index: 3,
    },
];

pub fn levels_for_role_type(role_type: RoleType) -> &'static [Level] {
    match role_type {
        RoleType::Ic => IC_LEVELS,
        RoleType::Management => MANAGEMENT_LEVELS,
    }
}

impl LevelKey {
    pub const ALL: [LevelKey; 9] = [
        LevelKey::P1Entry,
        LevelKey::P2Developing,
        LevelKey::P3Career,
        LevelKey::P4Advanced,
        LevelKey::P5Expert,
        LevelKey::M1TeamLead,
        LevelKey::M2Manager,
        LevelKey::M3Director,
        LevelKey::M4SeniorDirector,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LevelKey::P1Entry => "p1_entry",
            LevelKey::P2Developing => "p2_developing",
            LevelKey::P3Career => "p3_career",
            LevelKey::P4Advanced => "p4_advanced",
            LevelKey::P5Expert => "p5_expert",
            LevelKey::M1TeamLead => "m1_team_lead",
            LevelKey::M2Manager => "m2_manager",
            LevelKey::M3Director => "m3_director",
            LevelKey::M4SeniorDirector => "m4_senior_director",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    pub fn role_type(self) -> RoleType {
        match self {
            LevelKey::P1Entry
            | LevelKey::P2Developing
            | LevelKey::P3Career
            | LevelKey::P4Advanced
            | LevelKey::P5Expert => RoleType::Ic,
            LevelKey::M1TeamLead
            | LevelKey::M2Manager
            | LevelKey::M3Director
            | LevelKey::M4SeniorDirector => RoleType::Management,
        }
    }

    pub fn level(self) -> Level {
        let levels = levels_for_role_type(self.role_type());
        // every key appears exactly once in its role's table
        levels
            .iter()
            .copied()
            .find(|level| level.key == self)
            .unwrap_or(levels[0])
    }

    pub fn index(self) -> usize {
        self.level().index
    }

    pub fn label(self) -> &'static str {
        self.level().label
    }

    pub fn legacy(self) -> Option<LegacyLevel> {
        match self {
            LevelKey::P1Entry => Some(LegacyLevel::Beginner),
            LevelKey::P2Developing => Some(LegacyLevel::Intermediate),
            LevelKey::P3Career => Some(LegacyLevel::Advanced),
            LevelKey::P4Advanced => Some(LegacyLevel::Expert),
            _ => None,
        }
    }
}

/// Case-insensitive lookup of a display label ("Senior") within one role's ladder.
pub fn label_to_key(role_type: RoleType, label: &str) -> Option<LevelKey> {
    let needle = label.trim();
    levels_for_role_type(role_type)
        .iter()
        .find(|level| level.label.eq_ignore_ascii_case(needle))
        .map(|level| level.key)
}

pub fn key_to_label(key: LevelKey) -> &'static str {
    key.label()
}

fn position(levels: &[Level], key: LevelKey) -> Option<usize> {
    levels.iter().position(|level| level.key == key)
}

pub fn level_above(levels: &[Level], key: LevelKey) -> Option<Level> {
    level_n_above(levels, key, 1)
}

pub fn level_n_above(levels: &[Level], key: LevelKey, n: usize) -> Option<Level> {
    let pos = position(levels, key)?;
    levels.get(pos.checked_add(n)?).copied()
}

pub fn level_n_below(levels: &[Level], key: LevelKey, n: usize) -> Option<Level> {
    let pos = position(levels, key)?;
    levels.get(pos.checked_sub(n)?).copied()
}

/// Signed offset walk; negative goes down the ladder.
pub fn level_offset(levels: &[Level], key: LevelKey, offset: isize) -> Option<Level> {
    if offset >= 0 {
        level_n_above(levels, key, offset.unsigned_abs())
    } else {
        level_n_below(levels, key, offset.unsigned_abs())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/levels.rs"]
mod tests;
