//! Trajectory builder: aligns every security across all periods.
//!
//! The union of identifiers over all snapshots gets one record each. A
//! security missing from a period is observed as holding zero there, so a
//! position that only exists in the oldest period still produces a record
//! ending in a LIQUIDATED transition.

use std::collections::{BTreeMap, BTreeSet};

use super::runs::{consecutive_decreases, consecutive_increases};
use super::transition::classify_change;
use crate::domain::{
    AnalysisRecord, Observation, PeriodSnapshot, SecurityId, Transition, UNKNOWN_NAME,
};
use crate::error::AnalysisError;

/// Per-security analysis keyed by identifier.
pub type AnalysisMap = BTreeMap<SecurityId, AnalysisRecord>;

/// Build an analysis record for every security in `snapshots`.
///
/// `snapshots` must be ordered most recent first. Fails only when the list
/// is empty.
pub fn analyze_trajectories(snapshots: &[PeriodSnapshot]) -> Result<AnalysisMap, AnalysisError> {
    if snapshots.is_empty() {
        return Err(AnalysisError::EmptyHistory);
    }

    let ids: BTreeSet<&SecurityId> = snapshots.iter().flat_map(|s| s.holdings.keys()).collect();

    Ok(ids
        .into_iter()
        .map(|id| (id.clone(), build_record(id, snapshots)))
        .collect())
}

fn build_record(id: &SecurityId, snapshots: &[PeriodSnapshot]) -> AnalysisRecord {
    let history: Vec<Observation> = snapshots.iter().map(|s| observe(id, s)).collect();
    let transitions = transitions_for(&history);
    let (current_shares, current_value) = history
        .first()
        .map(|o| (o.shares, o.value))
        .unwrap_or((0, 0));

    AnalysisRecord {
        id: id.clone(),
        name: resolve_name(&history),
        consecutive_decreases: consecutive_decreases(&transitions),
        consecutive_increases: consecutive_increases(&transitions),
        current_shares,
        current_value,
        history,
        transitions,
    }
}

fn observe(id: &SecurityId, snapshot: &PeriodSnapshot) -> Observation {
    match snapshot.holdings.get(id) {
        Some(h) => Observation {
            date: snapshot.date.clone(),
            shares: h.shares,
            value: h.value,
            name: (!h.name.is_empty()).then(|| h.name.clone()),
        },
        None => Observation::absent(&snapshot.date),
    }
}

/// First recorded name scanning from the most recent period, or `UNKNOWN`.
pub fn resolve_name(history: &[Observation]) -> String {
    history
        .iter()
        .find_map(|o| o.name.clone())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Transitions between adjacent observations, most recent first.
pub fn transitions_for(history: &[Observation]) -> Vec<Transition> {
    history
        .windows(2)
        .map(|pair| {
            let (curr, prev) = (&pair[0], &pair[1]);
            let (kind, percent) = classify_change(curr.shares, prev.shares);
            Transition {
                kind,
                percent,
                from_date: prev.date.clone(),
                to_date: curr.date.clone(),
            }
        })
        .collect()
}
