use serde::{Deserialize, Serialize};

use crate::model::catalog::SubCompetency;
use crate::model::levels::{LegacyLevel, Level, LevelKey, level_offset};

/// Criteria for one level of a sub-competency. Position `i` in adjacent levels'
/// lists is the same statement phrased at a different bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCriteria {
    pub level: LevelKey,
    pub criteria: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCriteria {
    #[serde(default)]
    pub beginner: Vec<String>,
    #[serde(default)]
    pub intermediate: Vec<String>,
    #[serde(default)]
    pub advanced: Vec<String>,
    #[serde(default)]
    pub expert: Vec<String>,
}

impl LegacyCriteria {
    pub fn get(&self, level: LegacyLevel) -> &[String] {
        match level {
            LegacyLevel::Beginner => &self.beginner,
            LegacyLevel::Intermediate => &self.intermediate,
            LegacyLevel::Advanced => &self.advanced,
            LegacyLevel::Expert => &self.expert,
        }
    }

    pub fn entries(&self) -> [(LegacyLevel, &[String]); 4] {
        [
            (LegacyLevel::Beginner, self.beginner.as_slice()),
            (LegacyLevel::Intermediate, self.intermediate.as_slice()),
            (LegacyLevel::Advanced, self.advanced.as_slice()),
            (LegacyLevel::Expert, self.expert.as_slice()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, c)| c.is_empty())
    }
}

/// Criteria for `level`, falling back to the legacy field the level maps to.
/// Returns an empty slice when neither has anything; callers show "No criteria".
pub fn criteria_for_level_with_fallback(sub: &SubCompetency, level: LevelKey) -> &[String] {
    if let Some(entry) = sub.level_criteria.iter().find(|c| c.level == level) {
        return &entry.criteria;
    }
    match level.legacy() {
        Some(legacy) => sub.legacy_criteria.get(legacy),
        None => &[],
    }
}

/// The statement at `position` in the level `offset` steps away from `level`.
/// Used for "what the next bar looks like" hints next to a criterion.
pub fn aligned_criterion<'a>(
    sub: &'a SubCompetency,
    levels: &[Level],
    level: LevelKey,
    position: usize,
    offset: isize,
) -> Option<&'a str> {
    let target = level_offset(levels, level, offset)?;
    criteria_for_level_with_fallback(sub, target.key)
        .get(position)
        .map(String::as_str)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/criteria.rs"]
mod tests;
