use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod criteria;
pub mod levels;
pub mod rating;
pub mod records;

pub use catalog::{Catalog, Competency, SubCompetency};
pub use levels::{LegacyLevel, Level, LevelKey, RoleType};
pub use rating::Rating;
pub use records::{
    Assessment, AssessmentRecord, AssessmentStatus, CriteriaEvaluation, NewEvaluation, Progress,
    ProgressRecord, Subject, SubjectKind,
};

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(CompetencyId);
id_type!(SubCompetencyId);
id_type!(SubjectId);
id_type!(AssessmentId);
id_type!(ProgressId);
id_type!(EvaluationId);
