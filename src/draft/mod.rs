pub mod memory;
pub mod prompts;
pub mod session;
pub mod steps;
pub mod store;

pub use memory::MemoryStore;
pub use session::{DraftSession, SessionConfig, StepDraft, StepStatus};
pub use steps::{StepPlan, WizardStep};
pub use store::{AssessmentStore, latest_completed_record, load_assessment_record};
