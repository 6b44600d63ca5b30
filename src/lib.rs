//! Competency assessment engine: level-relative criteria, the rating scale and
//! its two aggregation strategies, trend classification across assessments, and
//! the draft wizard session that produces the ratings.

pub mod draft;
pub mod error;
pub mod input;
pub mod model;
pub mod report;
pub mod scoring;
pub mod tracing;
pub mod trend;

pub use error::{EngineError, StoreError, ValidationError};

#[cfg(test)]
#[path = "../tests/src_inline/fixtures.rs"]
pub(crate) mod fixtures;
