//! HoldLab Core — holdings trajectories and signal classification.
//!
//! This crate contains:
//! - Domain types (period snapshots, observations, transitions, analysis records)
//! - Trajectory builder: per-security history, transitions, consecutive runs
//! - Signal classifier: exclusion list, watchlist, ranked portfolio
//! - Data layer: holdings provider trait, SEC EDGAR provider, information-table parser
//!
//! The engine (`analysis`, `signals`) is pure: no I/O, no shared state.

pub mod analysis;
pub mod data;
pub mod domain;
pub mod error;
pub mod signals;

pub use analysis::{analyze_trajectories, AnalysisMap};
pub use error::AnalysisError;
pub use signals::{classify_signals, SignalReport};
