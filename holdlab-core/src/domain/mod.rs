//! Domain types for holdings trajectories

pub mod holding;
pub mod ids;
pub mod record;
pub mod transition;

pub use holding::{Holding, Holdings, PeriodSnapshot};
pub use ids::SecurityId;
pub use record::{AnalysisRecord, Observation, UNKNOWN_NAME};
pub use transition::{Transition, TransitionType};

/// Period key (a filing date such as `2024-05-15`); string-comparable.
pub type PeriodDate = String;
