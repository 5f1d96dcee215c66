//! Local JSON snapshot files for offline analysis.
//!
//! Format: a JSON array of `{ "date": ..., "holdings": { id: {name, shares, value} } }`
//! ordered most recent first.

use std::path::Path;

use super::provider::DataError;
use crate::domain::PeriodSnapshot;

pub fn load_snapshots(path: &Path) -> Result<Vec<PeriodSnapshot>, DataError> {
    let content = std::fs::read_to_string(path)?;
    parse_snapshots(&content)
}

pub fn parse_snapshots(json: &str) -> Result<Vec<PeriodSnapshot>, DataError> {
    serde_json::from_str(json).map_err(|e| DataError::Parse(format!("snapshot file: {e}")))
}
