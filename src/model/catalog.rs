use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::criteria::{LegacyCriteria, LevelCriteria};
use crate::model::levels::{Level, RoleType, levels_for_role_type};
use crate::model::{CompetencyId, SubCompetencyId};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CODE_LEN: usize = 32;
pub const MAX_CRITERION_LEN: usize = 500;
pub const MAX_NOTES_LEN: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCompetency {
    pub id: SubCompetencyId,
    pub competency_id: CompetencyId,
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub level_criteria: Vec<LevelCriteria>,
    #[serde(default)]
    pub legacy_criteria: LegacyCriteria,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competency {
    pub id: CompetencyId,
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub sub_competencies: Vec<SubCompetency>,
}

/// Validated, ordered competency framework for one role type.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    role_type: RoleType,
    competencies: Vec<Competency>,
}

impl Catalog {
    pub fn new(
        role_type: RoleType,
        mut competencies: Vec<Competency>,
    ) -> Result<Self, ValidationError> {
        let mut codes = BTreeSet::new();
        let mut competency_ids = BTreeSet::new();
        let mut sub_ids = BTreeSet::new();
        for competency in &competencies {
            validate_competency(competency)?;
            if !competency_ids.insert(competency.id) {
                return Err(ValidationError::DuplicateId {
                    entity: "competency",
                    id: competency.id.0,
                });
            }
            if !codes.insert(competency.code.clone()) {
                return Err(ValidationError::DuplicateCode {
                    code: competency.code.clone(),
                });
            }
            for sub in &competency.sub_competencies {
                if !sub_ids.insert(sub.id) {
                    return Err(ValidationError::DuplicateId {
                        entity: "sub-competency",
                        id: sub.id.0,
                    });
                }
                if !codes.insert(sub.code.clone()) {
                    return Err(ValidationError::DuplicateCode {
                        code: sub.code.clone(),
                    });
                }
            }
        }

        competencies.sort_by_key(|c| c.order_index);
        for competency in &mut competencies {
            competency.sub_competencies.sort_by_key(|s| s.order_index);
        }

        Ok(Self {
            role_type,
            competencies,
        })
    }

    pub fn role_type(&self) -> RoleType {
        self.role_type
    }

    pub fn levels(&self) -> &'static [Level] {
        levels_for_role_type(self.role_type)
    }

    pub fn competencies(&self) -> &[Competency] {
        &self.competencies
    }

    pub fn competency(&self, id: CompetencyId) -> Option<&Competency> {
        self.competencies.iter().find(|c| c.id == id)
    }

    pub fn sub_competency(&self, id: SubCompetencyId) -> Option<&SubCompetency> {
        self.ordered_sub_competencies().find(|s| s.id == id)
    }

    /// Competency order first, then sub-competency order. This is the wizard's step order.
    pub fn ordered_sub_competencies(&self) -> impl Iterator<Item = &SubCompetency> {
        self.competencies
            .iter()
            .flat_map(|c| c.sub_competencies.iter())
    }

    pub fn sub_competency_count(&self) -> usize {
        self.competencies
            .iter()
            .map(|c| c.sub_competencies.len())
            .sum()
    }
}

pub fn validate_competency(competency: &Competency) -> Result<(), ValidationError> {
    validate_title("competency title", &competency.title)?;
    validate_code("competency code", &competency.code)?;
    for sub in &competency.sub_competencies {
        if sub.competency_id != competency.id {
            return Err(ValidationError::WrongParent {
                code: sub.code.clone(),
                competency: competency.code.clone(),
            });
        }
        validate_sub_competency(sub)?;
    }
    Ok(())
}

pub fn validate_sub_competency(sub: &SubCompetency) -> Result<(), ValidationError> {
    validate_title("sub-competency title", &sub.title)?;
    validate_code("sub-competency code", &sub.code)?;
    for entry in &sub.level_criteria {
        validate_criteria(&entry.criteria)?;
    }
    for (_, criteria) in sub.legacy_criteria.entries() {
        validate_criteria(criteria)?;
    }
    Ok(())
}

pub fn validate_title(field: &'static str, title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

fn validate_code(field: &'static str, code: &str) -> Result<(), ValidationError> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    if code.chars().count() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_CODE_LEN,
        });
    }
    Ok(())
}

pub fn validate_criteria(criteria: &[String]) -> Result<(), ValidationError> {
    for criterion in criteria {
        if criterion.trim().is_empty() {
            return Err(ValidationError::Empty { field: "criteria" });
        }
        if criterion.chars().count() > MAX_CRITERION_LEN {
            return Err(ValidationError::TooLong {
                field: "criterion",
                max: MAX_CRITERION_LEN,
            });
        }
    }
    Ok(())
}

pub fn validate_notes(notes: &str) -> Result<(), ValidationError> {
    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes",
            max: MAX_NOTES_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/catalog.rs"]
mod tests;
