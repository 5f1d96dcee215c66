//! Trajectory analysis: histories, transitions, and consecutive runs.

pub mod runs;
pub mod trajectory;
pub mod transition;

pub use runs::{consecutive_decreases, consecutive_increases, leading_run};
pub use trajectory::{analyze_trajectories, resolve_name, transitions_for, AnalysisMap};
pub use transition::classify_change;
