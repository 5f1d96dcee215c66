//! Engine error type.

use thiserror::Error;

/// The only condition under which trajectory analysis fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no period snapshots to analyze")]
    EmptyHistory,
}
